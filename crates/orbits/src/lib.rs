//! Orbit diagram assembly.
//!
//! Builds a radial orbit diagram inside a [`SceneGraph`] document. The
//! document must hold a `Background` layer, whose center every orbit is
//! placed around, and an `OrbitsPrototype` layer with the template subtrees
//! (`Curve`, `PrimaryAnchor`, `SecondaryAnchor`, `Segment`, `Title`) that are
//! cloned for each orbit.
//!
//! # Example
//! ```ignore
//! use orbits::{build_diagram, DiagramConfig, OrbitSpec};
//!
//! let mut orbits = vec![OrbitSpec::new("Inner", 50.0, 30.0).with_title_angle(90.0)];
//! let report = build_diagram(Some(&mut document), &mut orbits, &DiagramConfig::default())?;
//! for warning in report.warnings() {
//!     log::warn!("{warning}");
//! }
//! ```

mod assemble;
mod config;
mod context;
mod diagram;
mod error;
mod orbit;

pub use assemble::{assemble_orbit, curve_scale, title_range, OrbitOutcome};
pub use config::{DiagramConfig, LayerNames};
pub use context::{DiagramContext, PrototypeLibrary};
pub use diagram::{build_diagram, DiagramReport, OrbitSource};
pub use error::{DiagramError, OrbitWarning};
pub use orbit::{OrbitSpec, Translation};

pub use scene_graph::SceneGraph;
