//! # Geometry primitives for Starmap
//!
//! Shared math used by the scene graph and the orbit assembler: host-style
//! bounding boxes, document unit constants, and the elliptical
//! parametrization that places and orients glyphs along an orbit.

pub mod bounds;
pub mod ellipse;
pub mod units;

pub use bounds::Bounds;
pub use ellipse::{ring_angle, Ellipse, EllipseError};
pub use units::{degrees_to_radians, radians_to_degrees, MILLIMETERS_TO_POINTS, RADIANS_TO_DEGREES};
