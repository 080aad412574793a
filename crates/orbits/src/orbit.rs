use geometry::{degrees_to_radians, Ellipse};
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Offset applied to a whole orbit after assembly, in document units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Translation {
    pub x: f64,
    pub y: f64,
}

/// One orbit of the diagram.
///
/// Radii are in millimeters and angles in degrees.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitSpec {
    pub title: String,
    /// Horizontal semi-axis
    pub r1: f64,
    /// Vertical semi-axis
    pub r2: f64,
    /// Angular offset of the first anchor
    pub zero_delta: f64,
    /// Rotation of the finished orbit about its own center
    pub rotation: f64,
    pub translation: Translation,
    /// Where the title sits on the ellipse, relative to `zero_delta`
    pub title_angle: f64,
}

impl OrbitSpec {
    pub fn new(title: impl Into<String>, r1: f64, r2: f64) -> Self {
        Self {
            title: title.into(),
            r1,
            r2,
            ..Default::default()
        }
    }

    pub fn with_zero_delta(mut self, degrees: f64) -> Self {
        self.zero_delta = degrees;
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_translation(mut self, x: f64, y: f64) -> Self {
        self.translation = Translation { x, y };
        self
    }

    pub fn with_title_angle(mut self, degrees: f64) -> Self {
        self.title_angle = degrees;
        self
    }

    pub fn zero_delta_radians(&self) -> f64 {
        degrees_to_radians(self.zero_delta)
    }

    /// Title position in radians, measured from the ellipse's zero angle.
    pub fn title_angle_radians(&self) -> f64 {
        degrees_to_radians(self.title_angle + self.zero_delta)
    }

    pub fn ellipse(&self, center: DVec2, units_per_mm: f64) -> Ellipse {
        Ellipse::new(self.r1, self.r2, center).with_units_per_mm(units_per_mm)
    }
}
