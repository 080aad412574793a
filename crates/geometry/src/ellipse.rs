//! Elliptical parametrization for orbit placement
//!
//! An orbit is an ellipse with semi-axes given in millimeters, centered at a
//! point in document units. [`Ellipse::point_at`] converts a parametric angle
//! into a document position and [`Ellipse::orthonormal_angle`] returns the
//! rotation that lines a glyph's local "up" axis up with the ellipse normal at
//! that position.

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::DVec2;

use crate::units::MILLIMETERS_TO_POINTS;

/// Axis deltas smaller than this (in document units) count as zero.
const VERTEX_EPSILON: f64 = 1e-9;

/// Errors produced by the ellipse parametrization.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum EllipseError {
    /// The tangent slope is undefined, e.g. the point coincides with the
    /// center or a zero radius leaves `0 / 0`.
    #[error("orthonormal angle is undefined at ({x}, {y})")]
    DegenerateEllipseAngle { x: f64, y: f64 },
}

/// An ellipse with millimeter semi-axes placed in document space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ellipse {
    /// Horizontal semi-axis in millimeters
    pub r1: f64,
    /// Vertical semi-axis in millimeters
    pub r2: f64,
    /// Center in document units
    pub center: DVec2,
    /// Document units per millimeter
    pub units_per_mm: f64,
}

impl Ellipse {
    /// Creates an ellipse in a point-based document.
    pub fn new(r1: f64, r2: f64, center: DVec2) -> Self {
        Self {
            r1,
            r2,
            center,
            units_per_mm: MILLIMETERS_TO_POINTS,
        }
    }

    /// Overrides the document unit scale.
    pub fn with_units_per_mm(mut self, units_per_mm: f64) -> Self {
        self.units_per_mm = units_per_mm;
        self
    }

    /// Returns the full width and height of the ellipse in document units.
    pub fn size(&self) -> DVec2 {
        DVec2::new(
            self.r1 * 2.0 * self.units_per_mm,
            self.r2 * 2.0 * self.units_per_mm,
        )
    }

    /// Returns the document position at parametric `angle` (radians).
    pub fn point_at(&self, angle: f64) -> DVec2 {
        let x = self.r1 * angle.cos() * self.units_per_mm + self.center.x;
        let y = self.r2 * angle.sin() * self.units_per_mm + self.center.y;
        DVec2::new(x, y)
    }

    /// Returns the rotation (radians) aligning a glyph with the outward
    /// normal at `point`, which is expected to lie on the ellipse.
    ///
    /// The slope comes from the implicit ellipse tangent:
    /// `k = -(dx * r2²) / (dy * r1²)` and the angle is `atan(k) - π/2`.
    /// At a major-axis vertex (`dy == 0`) the slope is infinite and the limit
    /// of the formula, `0.0`, is returned. When the slope is `0 / 0` there is
    /// no meaningful orientation and an error is returned instead.
    pub fn orthonormal_angle(&self, point: DVec2) -> Result<f64, EllipseError> {
        let x = self.center.x - point.x;
        let y = self.center.y - point.y;

        if y.abs() < VERTEX_EPSILON && x.abs() >= VERTEX_EPSILON {
            return Ok(0.0);
        }

        let k = -(x * self.r2 * self.r2) / (y * self.r1 * self.r1);
        if k.is_nan() {
            return Err(EllipseError::DegenerateEllipseAngle {
                x: point.x,
                y: point.y,
            });
        }

        Ok(k.atan() - FRAC_PI_2)
    }
}

/// Returns the angle of the `index`-th of `count` evenly spaced ring
/// positions, shifted by `offset` radians.
///
/// `index` may be fractional to address positions between two slots.
pub fn ring_angle(count: usize, index: f64, offset: f64) -> f64 {
    TAU / count as f64 * index + offset
}
