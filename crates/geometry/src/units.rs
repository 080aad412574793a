//! Document unit constants
//!
//! Documents are measured in points. Orbit radii arrive in millimeters and
//! angles in degrees, so both conversions happen in exactly one place.

/// Points per millimeter for point-based documents.
pub const MILLIMETERS_TO_POINTS: f64 = 2.83465;

/// Degrees per radian, truncated to the precision the diagram formulas use.
///
/// Every degree/radian conversion in the pipeline goes through this value,
/// so a rotation converted one way and back is exact.
pub const RADIANS_TO_DEGREES: f64 = 57.2958;

/// Converts an angle in degrees to radians.
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees / RADIANS_TO_DEGREES
}

/// Converts an angle in radians to degrees.
pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * RADIANS_TO_DEGREES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_right_angle_conversion() {
        let quarter = degrees_to_radians(90.0);
        assert!((quarter - std::f64::consts::FRAC_PI_2).abs() < 1e-5);
        assert!((radians_to_degrees(quarter) - 90.0).abs() < 1e-12);
    }
}
