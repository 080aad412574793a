//! Building a whole diagram

use glam::DVec2;
use scene_graph::{LayerId, SceneGraph};

use crate::{
    assemble_orbit, DiagramConfig, DiagramContext, DiagramError, OrbitOutcome, OrbitSpec,
    OrbitWarning,
};

/// Supplies the orbit list for a build.
pub trait OrbitSource {
    fn load_orbits(&mut self) -> Result<Vec<OrbitSpec>, DiagramError>;
}

impl OrbitSource for Vec<OrbitSpec> {
    fn load_orbits(&mut self) -> Result<Vec<OrbitSpec>, DiagramError> {
        Ok(self.clone())
    }
}

/// What a build produced.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagramReport {
    /// Top-level layer holding every orbit
    pub orbits_layer: LayerId,
    /// Center of the background, shared by all orbits
    pub center: DVec2,
    /// One entry per orbit, in input order
    pub orbits: Vec<OrbitOutcome>,
}

impl DiagramReport {
    pub fn warnings(&self) -> impl Iterator<Item = &OrbitWarning> {
        self.orbits.iter().flat_map(|orbit| orbit.warnings.iter())
    }
}

/// Builds the diagram into `document`.
///
/// The document, config and orbit list are all checked before anything is
/// added to the document. Orbits are then assembled in input order into a
/// new top-level `Orbits` layer; an error partway through leaves the orbits
/// assembled so far in place.
pub fn build_diagram(
    document: Option<&mut SceneGraph>,
    source: &mut dyn OrbitSource,
    config: &DiagramConfig,
) -> Result<DiagramReport, DiagramError> {
    let scene = document.ok_or(DiagramError::NoActiveDocument)?;
    config.validate()?;
    let context = DiagramContext::resolve(scene, config)?;
    let orbits = source.load_orbits()?;

    let center = scene.center(context.background);
    let orbits_layer = scene.create_named_layer(context.destination, config.layers.orbits.clone())?;
    log::info!(
        "building {} orbit(s) around ({:.3}, {:.3})",
        orbits.len(),
        center.x,
        center.y
    );

    let mut outcomes = Vec::with_capacity(orbits.len());
    for spec in &orbits {
        let outcome = assemble_orbit(
            scene,
            spec,
            &context.prototypes,
            orbits_layer,
            center,
            config,
        )?;
        outcomes.push(outcome);
    }

    Ok(DiagramReport {
        orbits_layer,
        center,
        orbits: outcomes,
    })
}
