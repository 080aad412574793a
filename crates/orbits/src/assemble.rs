//! Assembly of a single orbit from the prototype library

use std::f64::consts::PI;

use geometry::{degrees_to_radians, ring_angle, Ellipse};
use glam::DVec2;
use scene_graph::{Layer, LayerId, SceneGraph};

use crate::{DiagramConfig, DiagramError, OrbitSpec, OrbitWarning, PrototypeLibrary};

/// Result of assembling one orbit.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitOutcome {
    pub title: String,
    /// Root layer of the orbit's subtree
    pub layer: LayerId,
    pub warnings: Vec<OrbitWarning>,
}

/// Builds one orbit under `destination`.
///
/// The orbit's layer holds a scaled copy of the curve, an anchor layer, a
/// segment layer and the title, in that creation order. The finished subtree
/// is rotated about its own center and then translated.
///
/// A title prototype without a text frame and glyphs with an undefined
/// orientation are recorded as warnings on the outcome.
pub fn assemble_orbit(
    scene: &mut SceneGraph,
    spec: &OrbitSpec,
    prototypes: &PrototypeLibrary,
    destination: LayerId,
    center: DVec2,
    config: &DiagramConfig,
) -> Result<OrbitOutcome, DiagramError> {
    let names = &config.layers;
    let ellipse = spec.ellipse(center, config.units_per_mm);
    let mut warnings = Vec::new();

    log::debug!(
        "assembling orbit `{}` (r1 {}mm, r2 {}mm)",
        spec.title,
        spec.r1,
        spec.r2
    );
    let orbit = scene.create_named_layer(destination, spec.title.clone())?;

    let curve = scene.clone_layer(prototypes.curve, orbit)?;
    fit_curve(scene, curve, &ellipse)?;

    let anchors = scene.create_named_layer(orbit, names.anchors.clone())?;
    let zero_delta = spec.zero_delta_radians();
    for index in 0..config.anchors_count {
        let prototype = if index == 0 {
            prototypes.primary_anchor
        } else {
            prototypes.secondary_anchor
        };
        let angle = ring_angle(config.anchors_count, index as f64, zero_delta);
        place_glyph(scene, prototype, anchors, &ellipse, angle, &mut warnings)?;
    }

    let segments = scene.create_named_layer(orbit, names.segments.clone())?;
    let steps = (config.segments_per_anchor + 1) as f64;
    for anchor in 0..config.anchors_count {
        for segment in 0..config.segments_per_anchor {
            let index = anchor as f64 + (segment + 1) as f64 / steps;
            let angle = ring_angle(config.anchors_count, index, zero_delta);
            place_glyph(scene, prototypes.segment, segments, &ellipse, angle, &mut warnings)?;
        }
    }

    let title = scene.clone_layer(prototypes.title, orbit)?;
    if let Some(warning) = set_title(scene, title, spec, &ellipse)? {
        log::warn!("orbit `{}`: {warning}", spec.title);
        warnings.push(warning);
    }

    scene.rotate(orbit, degrees_to_radians(spec.rotation), None);
    scene.translate(orbit, DVec2::new(spec.translation.x, spec.translation.y));

    log::trace!(
        "orbit `{}` done: {} items, bounds {:?}",
        spec.title,
        scene.item_count(orbit),
        scene.bounds(orbit)
    );

    Ok(OrbitOutcome {
        title: spec.title.clone(),
        layer: orbit,
        warnings,
    })
}

/// Per-axis factors that scale a subtree of size `current` to the full
/// extent of `ellipse`, or `None` when either side of `current` is zero.
pub fn curve_scale(current: DVec2, ellipse: &Ellipse) -> Option<DVec2> {
    if current.x == 0.0 || current.y == 0.0 || !current.is_finite() {
        return None;
    }
    let target = ellipse.size();
    Some(DVec2::new(target.x / current.x, target.y / current.y))
}

/// Parametric start and end of a title centered at `angle` radians on its
/// four-segment text path.
pub fn title_range(angle: f64) -> (f64, f64) {
    let middle = 4.0 - 4.0 / PI / 2.0 * angle;
    (middle - 1.0, middle + 1.0)
}

fn fit_curve(scene: &mut SceneGraph, curve: LayerId, ellipse: &Ellipse) -> Result<(), DiagramError> {
    let factors =
        curve_scale(scene.size(curve), ellipse).ok_or_else(|| DiagramError::ZeroSizeBounds {
            name: scene.path(curve),
        })?;
    scene.scale(curve, factors.x, factors.y);
    scene.move_to(curve, ellipse.center);
    Ok(())
}

fn place_glyph(
    scene: &mut SceneGraph,
    prototype: LayerId,
    parent: LayerId,
    ellipse: &Ellipse,
    angle: f64,
    warnings: &mut Vec<OrbitWarning>,
) -> Result<(), DiagramError> {
    let glyph = scene.clone_layer(prototype, parent)?;
    let position = ellipse.point_at(angle);
    scene.move_to(glyph, position);

    match ellipse.orthonormal_angle(position) {
        Ok(rotation) => scene.rotate(glyph, rotation, None),
        Err(err) => {
            let glyph = scene.path(glyph);
            log::warn!("{glyph}: {err}");
            warnings.push(OrbitWarning::DegenerateEllipseAngle { glyph });
        }
    }
    Ok(())
}

/// Writes the title onto the cloned title layer.
///
/// Returns a warning, and leaves the layer untouched, when it has no text
/// frame of its own.
fn set_title(
    scene: &mut SceneGraph,
    layer: LayerId,
    spec: &OrbitSpec,
    ellipse: &Ellipse,
) -> Result<Option<OrbitWarning>, DiagramError> {
    let path = scene.path(layer);
    let Some(text) = scene.layer_mut(layer).and_then(Layer::text_item_mut) else {
        return Ok(Some(OrbitWarning::MissingTextElement { layer: path }));
    };

    let size = ellipse.size();
    let (start, end) = title_range(spec.title_angle_radians());
    text.set_text_content(spec.title.clone())?;
    text.set_text_path_size(size.x, size.y)?;
    text.set_text_path_range(start, end)?;

    scene.move_to(layer, ellipse.center);
    scene.bring_to_front(layer)?;
    Ok(None)
}
