//! Starmap interchange formats
//!
//! Documents are stored as KDL. Pure data, no expressions: every layer and
//! item is written out in the order the document stacks them, frontmost
//! first.
//!
//! # Document Format
//!
//! ```kdl
//! document version="0.1" {
//!   layer "Background" {
//!     rect x=0.0 y=0.0 width=595.0 height=842.0
//!   }
//!   layer "OrbitsPrototype" {
//!     layer "Curve" {
//!       ellipse cx=0.0 cy=0.0 rx=10.0 ry=10.0
//!     }
//!     layer "Title" opacity=60.0 {
//!       text "Title" cx=0.0 cy=0.0 rx=20.0 ry=20.0 start=3.0 end=5.0
//!     }
//!   }
//! }
//! ```
//!
//! Orbit lists are read from XML, KDL or JSON; see [`OrbitListFormat`].

mod document;
mod orbit_list;

pub use document::Document;
pub use orbit_list::{
    orbits_from_json, orbits_from_kdl, orbits_from_xml, orbits_to_kdl, OrbitFile, OrbitListFormat,
};

pub const FORMAT_VERSION: &str = "0.1";

/// Error type for interchange operations.
#[derive(Debug, thiserror::Error)]
pub enum InterchangeError {
    #[error("failed to access {path}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid structure: {0}")]
    InvalidStructure(String),
    #[error("missing field: {0}")]
    MissingField(String),
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error("unsupported orbit list format: {0}")]
    UnsupportedFormat(String),
}
