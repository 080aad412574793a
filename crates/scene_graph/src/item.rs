//! Visual items: the leaves of the scene graph
//!
//! An item is a local [`Shape`] plus an affine placement in document space.
//! The methods on [`Item`] are the host-level primitives the transform engine
//! is written against: translate, rotate about the document origin, resize
//! about the item's own center, and the text-path setters.

use geometry::{degrees_to_radians, Bounds};
use glam::{DAffine2, DVec2};

use crate::SceneError;

/// Local geometry of an item, before its placement is applied.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle from `origin` spanning `size`
    Rect { origin: DVec2, size: DVec2 },
    /// Ellipse with semi-axes `radii`
    Ellipse { center: DVec2, radii: DVec2 },
    /// Polyline through `points`
    Path { points: Vec<DVec2>, closed: bool },
    /// Text set along an elliptical path
    Text(TextPath),
}

/// Text that runs along an elliptical path.
///
/// `start_t` and `end_t` are parametric positions on the path; the path has
/// four segments, so a full turn spans `0..4`.
#[derive(Clone, Debug, PartialEq)]
pub struct TextPath {
    pub contents: String,
    pub center: DVec2,
    pub radii: DVec2,
    pub start_t: f64,
    pub end_t: f64,
}

impl TextPath {
    pub fn new(contents: impl Into<String>, center: DVec2, radii: DVec2) -> Self {
        Self {
            contents: contents.into(),
            center,
            radii,
            start_t: 0.0,
            end_t: 4.0,
        }
    }
}

/// A visual item placed in document space.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub name: Option<String>,
    pub shape: Shape,
    /// Local-to-document placement
    pub transform: DAffine2,
}

impl Item {
    pub fn new(shape: Shape) -> Self {
        Self {
            name: None,
            shape,
            transform: DAffine2::IDENTITY,
        }
    }

    pub fn rect(origin: DVec2, size: DVec2) -> Self {
        Self::new(Shape::Rect { origin, size })
    }

    pub fn ellipse(center: DVec2, radii: DVec2) -> Self {
        Self::new(Shape::Ellipse { center, radii })
    }

    pub fn path(points: Vec<DVec2>, closed: bool) -> Self {
        Self::new(Shape::Path { points, closed })
    }

    pub fn text(text: TextPath) -> Self {
        Self::new(Shape::Text(text))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_transform(mut self, transform: DAffine2) -> Self {
        self.transform = transform;
        self
    }

    /// Geometric bounds in document space.
    ///
    /// Exact for every shape: rectangles and paths through their transformed
    /// vertices, ellipses (and text paths) through the extents of the
    /// transformed axes.
    pub fn bounds(&self) -> Bounds {
        match &self.shape {
            Shape::Rect { origin, size } => {
                let corners = [
                    *origin,
                    DVec2::new(origin.x + size.x, origin.y),
                    *origin + *size,
                    DVec2::new(origin.x, origin.y + size.y),
                ];
                Bounds::from_points(corners.map(|corner| self.transform.transform_point2(corner)))
            }
            Shape::Ellipse { center, radii } => self.ellipse_bounds(*center, *radii),
            Shape::Path { points, .. } => Bounds::from_points(
                points
                    .iter()
                    .map(|point| self.transform.transform_point2(*point)),
            ),
            Shape::Text(text) => self.ellipse_bounds(text.center, text.radii),
        }
    }

    fn ellipse_bounds(&self, center: DVec2, radii: DVec2) -> Bounds {
        let axes = self.transform.matrix2;
        let extent = DVec2::new(
            DVec2::new(axes.x_axis.x * radii.x, axes.y_axis.x * radii.y).length(),
            DVec2::new(axes.x_axis.y * radii.x, axes.y_axis.y * radii.y).length(),
        );
        Bounds::from_center_size(self.transform.transform_point2(center), extent * 2.0)
    }

    /// Moves the item by `(dx, dy)` document units.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.transform = DAffine2::from_translation(DVec2::new(dx, dy)) * self.transform;
    }

    /// Rotates the item counter-clockwise about the document origin.
    pub fn rotate(&mut self, degrees: f64) {
        self.transform = DAffine2::from_angle(degrees_to_radians(degrees)) * self.transform;
    }

    /// Resizes the item by percentages about the center of its own bounds.
    pub fn resize(&mut self, sx_percent: f64, sy_percent: f64) {
        let bounds = self.bounds();
        let anchor = if bounds.is_empty() {
            self.transform.translation
        } else {
            bounds.center()
        };
        let scale = DVec2::new(sx_percent / 100.0, sy_percent / 100.0);
        self.transform = DAffine2::from_translation(anchor)
            * DAffine2::from_scale(scale)
            * DAffine2::from_translation(-anchor)
            * self.transform;
    }

    pub fn is_text(&self) -> bool {
        matches!(self.shape, Shape::Text(_))
    }

    pub fn text_path(&self) -> Option<&TextPath> {
        match &self.shape {
            Shape::Text(text) => Some(text),
            _ => None,
        }
    }

    fn text_path_mut(&mut self) -> Result<&mut TextPath, SceneError> {
        match &mut self.shape {
            Shape::Text(text) => Ok(text),
            _ => Err(SceneError::NotText),
        }
    }

    /// Replaces the text of a text frame.
    pub fn set_text_content(&mut self, contents: impl Into<String>) -> Result<(), SceneError> {
        self.text_path_mut()?.contents = contents.into();
        Ok(())
    }

    /// Resets the text path to an upright ellipse of `width` by `height`
    /// around its current center.
    pub fn set_text_path_size(&mut self, width: f64, height: f64) -> Result<(), SceneError> {
        let center = self.bounds().center();
        let text = self.text_path_mut()?;
        text.center = DVec2::ZERO;
        text.radii = DVec2::new(width / 2.0, height / 2.0);
        self.transform = DAffine2::from_translation(center);
        Ok(())
    }

    /// Sets the parametric range the text occupies on its path.
    pub fn set_text_path_range(&mut self, start_t: f64, end_t: f64) -> Result<(), SceneError> {
        let text = self.text_path_mut()?;
        text.start_t = start_t;
        text.end_t = end_t;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {b}, got {a}");
    }

    #[test]
    fn test_rect_bounds_are_y_up() {
        let item = Item::rect(DVec2::new(10.0, 20.0), DVec2::new(100.0, 50.0));
        assert_eq!(item.bounds(), Bounds::new(10.0, 70.0, 110.0, 20.0));
    }

    #[test]
    fn test_translate() {
        let mut item = Item::ellipse(DVec2::ZERO, DVec2::new(5.0, 3.0));
        item.translate(10.0, -2.0);
        assert_eq!(item.bounds(), Bounds::new(5.0, 1.0, 15.0, -5.0));
    }

    #[test]
    fn test_rotated_ellipse_bounds() {
        let mut item = Item::ellipse(DVec2::ZERO, DVec2::new(5.0, 3.0));
        item.rotate(geometry::radians_to_degrees(std::f64::consts::FRAC_PI_2));

        let size = item.bounds().size();
        assert_close(size.x, 6.0);
        assert_close(size.y, 10.0);
    }

    #[test]
    fn test_rotate_about_document_origin() {
        let mut item = Item::rect(DVec2::new(10.0, -1.0), DVec2::new(2.0, 2.0));
        item.rotate(geometry::radians_to_degrees(std::f64::consts::PI));

        let center = item.bounds().center();
        assert_close(center.x, -11.0);
        assert_close(center.y, 0.0);
    }

    #[test]
    fn test_resize_keeps_own_center() {
        let mut item = Item::rect(DVec2::new(10.0, 10.0), DVec2::new(4.0, 2.0));
        let center = item.bounds().center();
        item.resize(250.0, 50.0);

        let bounds = item.bounds();
        assert_close(bounds.width(), 10.0);
        assert_close(bounds.height(), 1.0);
        assert_close(bounds.center().x, center.x);
        assert_close(bounds.center().y, center.y);
    }

    #[test]
    fn test_path_bounds() {
        let item = Item::path(
            vec![DVec2::new(0.0, 0.0), DVec2::new(3.0, 4.0), DVec2::new(-1.0, 2.0)],
            true,
        );
        assert_eq!(item.bounds(), Bounds::new(-1.0, 4.0, 3.0, 0.0));
        assert!(Item::path(Vec::new(), false).bounds().is_empty());
    }

    #[test]
    fn test_text_setters() {
        let mut item = Item::text(TextPath::new("", DVec2::new(1.0, 1.0), DVec2::new(2.0, 2.0)));
        item.translate(5.0, 5.0);

        item.set_text_content("Inner").unwrap();
        item.set_text_path_size(40.0, 20.0).unwrap();
        item.set_text_path_range(2.5, 4.5).unwrap();

        let text = item.text_path().unwrap();
        assert_eq!(text.contents, "Inner");
        assert_eq!((text.start_t, text.end_t), (2.5, 4.5));
        assert_eq!(item.bounds(), Bounds::from_center_size(DVec2::new(6.0, 6.0), DVec2::new(40.0, 20.0)));
    }

    #[test]
    fn test_text_setters_reject_shapes() {
        let mut item = Item::rect(DVec2::ZERO, DVec2::ONE);
        assert_eq!(item.set_text_content("x"), Err(SceneError::NotText));
        assert_eq!(item.set_text_path_range(0.0, 1.0), Err(SceneError::NotText));
    }
}
