//! Lookup and validation of the layers a diagram is built from

use scene_graph::{LayerId, SceneGraph};

use crate::{DiagramConfig, DiagramError, LayerNames};

/// The prototype subtrees every orbit is cloned from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PrototypeLibrary {
    pub root: LayerId,
    pub curve: LayerId,
    pub primary_anchor: LayerId,
    pub secondary_anchor: LayerId,
    pub segment: LayerId,
    pub title: LayerId,
}

impl PrototypeLibrary {
    /// Finds the prototypes among the direct children of `root`.
    ///
    /// Every glyph prototype must hold geometry and the curve must have a
    /// nonzero width and height, since it is scaled relative to its current
    /// size. The title is allowed to be empty: a missing text frame is
    /// reported per orbit instead.
    pub fn resolve(
        scene: &SceneGraph,
        root: LayerId,
        names: &LayerNames,
    ) -> Result<Self, DiagramError> {
        let find = |name: &str| {
            scene
                .find_layer_by_name(root, name)
                .ok_or_else(|| DiagramError::PrototypeNotFound {
                    name: name.to_string(),
                })
        };

        let library = Self {
            root,
            curve: find(&names.curve)?,
            primary_anchor: find(&names.primary_anchor)?,
            secondary_anchor: find(&names.secondary_anchor)?,
            segment: find(&names.segment)?,
            title: find(&names.title)?,
        };

        for (layer, name) in [
            (library.curve, &names.curve),
            (library.primary_anchor, &names.primary_anchor),
            (library.secondary_anchor, &names.secondary_anchor),
            (library.segment, &names.segment),
        ] {
            require_geometry(scene, layer, name)?;
        }

        let size = scene.size(library.curve);
        if size.x == 0.0 || size.y == 0.0 {
            return Err(DiagramError::ZeroSizeBounds {
                name: names.curve.clone(),
            });
        }

        Ok(library)
    }
}

/// Everything assembly needs from the document, resolved up front.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagramContext {
    pub background: LayerId,
    /// Parent of the generated `Orbits` layer
    pub destination: LayerId,
    pub prototypes: PrototypeLibrary,
}

impl DiagramContext {
    /// Looks up the background and prototype layers among the top-level
    /// layers of `scene`.
    pub fn resolve(scene: &SceneGraph, config: &DiagramConfig) -> Result<Self, DiagramError> {
        let names = &config.layers;
        let destination = scene.root();

        let background = scene
            .find_layer_by_name(destination, &names.background)
            .ok_or_else(|| DiagramError::LayerNotFound {
                name: names.background.clone(),
            })?;
        require_geometry(scene, background, &names.background)?;

        let prototype_root = scene
            .find_layer_by_name(destination, &names.prototype)
            .ok_or_else(|| DiagramError::PrototypeNotFound {
                name: names.prototype.clone(),
            })?;
        let prototypes = PrototypeLibrary::resolve(scene, prototype_root, names)?;

        log::debug!(
            "resolved diagram context: background {}, prototypes {}",
            scene.path(background),
            scene.path(prototype_root)
        );

        Ok(Self {
            background,
            destination,
            prototypes,
        })
    }
}

fn require_geometry(scene: &SceneGraph, layer: LayerId, name: &str) -> Result<(), DiagramError> {
    if scene.bounds(layer).is_empty() {
        return Err(DiagramError::EmptyLayer {
            name: name.to_string(),
        });
    }
    Ok(())
}
