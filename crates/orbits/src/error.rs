use std::fmt;

use scene_graph::SceneError;

/// Conditions that stop a diagram from being built.
///
/// Everything except [`DiagramError::Scene`] is reported before the document
/// is touched.
#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    #[error("no active document")]
    NoActiveDocument,

    #[error("layer `{name}` not found in the document")]
    LayerNotFound { name: String },

    #[error("prototype layer `{name}` not found")]
    PrototypeNotFound { name: String },

    #[error("layer `{name}` has no visual items")]
    EmptyLayer { name: String },

    #[error("layer `{name}` has zero width or height")]
    ZeroSizeBounds { name: String },

    #[error("invalid diagram config: {message}")]
    InvalidConfig { message: String },

    #[error("failed to read the orbit list")]
    InputParse(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// A recoverable problem met while assembling one orbit.
#[derive(Clone, Debug, PartialEq)]
pub enum OrbitWarning {
    /// The cloned title layer has no text frame; it was left as cloned.
    MissingTextElement { layer: String },
    /// A glyph sits where the ellipse normal is undefined; it was left
    /// unrotated.
    DegenerateEllipseAngle { glyph: String },
}

impl fmt::Display for OrbitWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrbitWarning::MissingTextElement { layer } => {
                write!(f, "{layer} has no text frame, title left unset")
            }
            OrbitWarning::DegenerateEllipseAngle { glyph } => {
                write!(f, "{glyph} has no defined orientation, left unrotated")
            }
        }
    }
}
