//! Bounds aggregation and subtree transforms
//!
//! Every operation here walks a layer's whole subtree through
//! [`SceneGraph::for_each_item_mut`] and rewrites item placements. Layers carry
//! no transform of their own, so a subtree's position is nothing more than
//! the positions of its items.
//!
//! Operations on a layer that does not exist touch nothing.

use geometry::{radians_to_degrees, Bounds};
use glam::DVec2;

use crate::{LayerId, SceneGraph};

impl SceneGraph {
    /// Union of the bounds of every item below `layer`.
    ///
    /// A subtree without items yields [`Bounds::EMPTY`]; callers that need a
    /// center or size must make sure the subtree holds geometry.
    pub fn bounds(&self, layer: LayerId) -> Bounds {
        let mut bounds = Bounds::EMPTY;
        self.for_each_item(layer, |item| bounds = bounds.union(&item.bounds()));
        bounds
    }

    /// Midpoint of [`SceneGraph::bounds`].
    pub fn center(&self, layer: LayerId) -> DVec2 {
        self.bounds(layer).center()
    }

    /// Absolute width and height of [`SceneGraph::bounds`].
    pub fn size(&self, layer: LayerId) -> DVec2 {
        self.bounds(layer).size()
    }

    /// Shifts every item below `layer` by `delta`.
    pub fn translate(&mut self, layer: LayerId, delta: DVec2) {
        self.for_each_item_mut(layer, |item| item.translate(delta.x, delta.y));
    }

    /// Resizes every item below `layer` by relative factors.
    ///
    /// Each item scales about its own center, not about a shared pivot, so
    /// the subtree only stays put when scaling precedes the final move.
    pub fn scale(&mut self, layer: LayerId, sx: f64, sy: f64) {
        self.for_each_item_mut(layer, |item| item.resize(sx * 100.0, sy * 100.0));
    }

    /// Rotates every item below `layer` by `angle` radians about `pivot`,
    /// or about the subtree's center when no pivot is given.
    ///
    /// Each item is moved so the pivot sits on the document origin, rotated
    /// about the origin, and moved back.
    pub fn rotate(&mut self, layer: LayerId, angle: f64, pivot: Option<DVec2>) {
        let pivot = pivot.unwrap_or_else(|| self.center(layer));
        let degrees = radians_to_degrees(angle);
        self.for_each_item_mut(layer, |item| {
            item.translate(-pivot.x, -pivot.y);
            item.rotate(degrees);
            item.translate(pivot.x, pivot.y);
        });
    }

    /// Translates `layer` so its center lands on `target`.
    pub fn move_to(&mut self, layer: LayerId, target: DVec2) {
        let center = self.center(layer);
        self.translate(layer, DVec2::new(target.x - center.x, target.y - center.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Item;
    use std::f64::consts::FRAC_PI_2;

    fn assert_close(a: DVec2, b: DVec2) {
        assert!((a - b).length() < 1e-6, "expected {b:?}, got {a:?}");
    }

    /// A layer with one rect directly and one ellipse in a child layer.
    fn sample() -> (SceneGraph, LayerId) {
        let mut graph = SceneGraph::new();
        let layer = graph.create_named_layer(graph.root(), "sample").unwrap();
        let child = graph.create_named_layer(layer, "child").unwrap();
        graph
            .layer_mut(layer)
            .unwrap()
            .push_item(Item::rect(DVec2::new(0.0, 0.0), DVec2::new(10.0, 10.0)));
        graph
            .layer_mut(child)
            .unwrap()
            .push_item(Item::ellipse(DVec2::new(20.0, 5.0), DVec2::new(5.0, 5.0)));
        (graph, layer)
    }

    #[test]
    fn test_bounds_unions_children() {
        let (graph, layer) = sample();
        assert_eq!(graph.bounds(layer), Bounds::new(0.0, 10.0, 25.0, 0.0));
        assert_close(graph.center(layer), DVec2::new(12.5, 5.0));
        assert_close(graph.size(layer), DVec2::new(25.0, 10.0));
    }

    #[test]
    fn test_bounds_of_empty_layer() {
        let mut graph = SceneGraph::new();
        let layer = graph.create_layer(graph.root()).unwrap();
        assert!(graph.bounds(layer).is_empty());
    }

    #[test]
    fn test_translate_moves_whole_subtree() {
        let (mut graph, layer) = sample();
        graph.translate(layer, DVec2::new(-5.0, 3.0));
        assert_eq!(graph.bounds(layer), Bounds::new(-5.0, 13.0, 20.0, 3.0));
    }

    #[test]
    fn test_scale_to_target_size() {
        let mut graph = SceneGraph::new();
        let layer = graph.create_layer(graph.root()).unwrap();
        graph
            .layer_mut(layer)
            .unwrap()
            .push_item(Item::ellipse(DVec2::new(3.0, 4.0), DVec2::new(5.0, 2.0)));

        let target = DVec2::new(113.386, 56.693);
        let size = graph.size(layer);
        graph.scale(layer, target.x / size.x, target.y / size.y);
        assert_close(graph.size(layer), target);
        // A single item scales about its own center
        assert_close(graph.center(layer), DVec2::new(3.0, 4.0));
    }

    #[test]
    fn test_scale_is_per_item() {
        let (mut graph, layer) = sample();
        graph.scale(layer, 2.0, 2.0);
        // Both items grow in place, so the gap between them shrinks.
        assert_eq!(graph.bounds(layer), Bounds::new(-5.0, 15.0, 30.0, -5.0));
    }

    #[test]
    fn test_rotate_roundtrip() {
        let (mut graph, layer) = sample();
        let placements = |graph: &SceneGraph| {
            let mut transforms = Vec::new();
            graph.for_each_item(layer, |item| transforms.push(item.transform));
            transforms
        };
        let original = placements(&graph);
        let pivot = DVec2::new(-7.0, 4.0);

        graph.rotate(layer, 0.7, Some(pivot));
        assert!(!placements(&graph)[0].abs_diff_eq(original[0], 1e-6));
        graph.rotate(layer, -0.7, Some(pivot));

        let restored = placements(&graph);
        assert_eq!(restored.len(), original.len());
        for (restored, original) in restored.iter().zip(&original) {
            assert!(
                restored.abs_diff_eq(*original, 1e-9),
                "expected {original:?}, got {restored:?}"
            );
        }
    }

    #[test]
    fn test_rotate_about_own_center() {
        let (mut graph, layer) = sample();
        let center = graph.center(layer);
        graph.rotate(layer, FRAC_PI_2, None);

        assert_close(graph.center(layer), center);
        assert_close(graph.size(layer), DVec2::new(10.0, 25.0));
    }

    #[test]
    fn test_move_to() {
        let (mut graph, layer) = sample();
        graph.move_to(layer, DVec2::new(100.0, -100.0));
        assert_close(graph.center(layer), DVec2::new(100.0, -100.0));
        assert_close(graph.size(layer), DVec2::new(25.0, 10.0));
    }
}
