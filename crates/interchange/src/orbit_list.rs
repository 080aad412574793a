//! Orbit list readers
//!
//! An orbit list is an ordered sequence of [`OrbitSpec`] records. Three
//! layouts are understood, picked by file extension:
//!
//! XML, one child element of the root per orbit:
//!
//! ```xml
//! <orbits>
//!   <orbit>
//!     <r1>50</r1><r2>30</r2>
//!     <zero_delta>0</zero_delta><rotation>0</rotation>
//!     <translation><x>0</x><y>0</y></translation>
//!     <title>Inner</title><title_angle>90</title_angle>
//!   </orbit>
//! </orbits>
//! ```
//!
//! KDL:
//!
//! ```kdl
//! orbits {
//!   orbit "Inner" r1=50 r2=30 zero_delta=0 rotation=0 title_angle=90 {
//!     translation x=0 y=0
//!   }
//! }
//! ```
//!
//! JSON, an array of objects with the same field names.

use std::path::{Path, PathBuf};

use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use orbits::{DiagramError, OrbitSource, OrbitSpec, Translation};

use crate::InterchangeError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OrbitListFormat {
    Xml,
    Kdl,
    Json,
}

impl OrbitListFormat {
    pub fn from_path(path: &Path) -> Result<Self, InterchangeError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "xml" => Ok(Self::Xml),
            "kdl" => Ok(Self::Kdl),
            "json" => Ok(Self::Json),
            _ => Err(InterchangeError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn parse(self, input: &str) -> Result<Vec<OrbitSpec>, InterchangeError> {
        match self {
            Self::Xml => orbits_from_xml(input),
            Self::Kdl => orbits_from_kdl(input),
            Self::Json => orbits_from_json(input),
        }
    }
}

/// An orbit list stored in a file, read when a build asks for it.
#[derive(Clone, Debug)]
pub struct OrbitFile {
    path: PathBuf,
    format: OrbitListFormat,
}

impl OrbitFile {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, InterchangeError> {
        let path = path.into();
        let format = OrbitListFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<Vec<OrbitSpec>, InterchangeError> {
        let input = std::fs::read_to_string(&self.path).map_err(|source| InterchangeError::Io {
            path: self.path.clone(),
            source,
        })?;
        let orbits = self.format.parse(&input)?;
        log::debug!("read {} orbit(s) from {}", orbits.len(), self.path.display());
        Ok(orbits)
    }
}

impl OrbitSource for OrbitFile {
    fn load_orbits(&mut self) -> Result<Vec<OrbitSpec>, DiagramError> {
        self.read()
            .map_err(|err| DiagramError::InputParse(Box::new(err)))
    }
}

pub fn orbits_from_json(input: &str) -> Result<Vec<OrbitSpec>, InterchangeError> {
    serde_json::from_str(input).map_err(|e| InterchangeError::Parse(e.to_string()))
}

/// Reads every element child of the root element as one orbit.
///
/// Missing numeric fields read as `0` and a missing title as empty.
pub fn orbits_from_xml(input: &str) -> Result<Vec<OrbitSpec>, InterchangeError> {
    let doc = roxmltree::Document::parse(input).map_err(|e| InterchangeError::Parse(e.to_string()))?;
    doc.root_element()
        .children()
        .filter(|node| node.is_element())
        .map(|node| orbit_from_xml(&node))
        .collect()
}

fn orbit_from_xml(node: &roxmltree::Node) -> Result<OrbitSpec, InterchangeError> {
    let translation = match xml_child(node, "translation") {
        Some(translation) => Translation {
            x: xml_number(&translation, "x")?,
            y: xml_number(&translation, "y")?,
        },
        None => Translation::default(),
    };

    Ok(OrbitSpec {
        title: xml_child(node, "title")
            .and_then(|title| title.text())
            .map(|text| text.trim().to_string())
            .unwrap_or_default(),
        r1: xml_number(node, "r1")?,
        r2: xml_number(node, "r2")?,
        zero_delta: xml_number(node, "zero_delta")?,
        rotation: xml_number(node, "rotation")?,
        translation,
        title_angle: xml_number(node, "title_angle")?,
    })
}

fn xml_child<'a, 'input>(
    node: &roxmltree::Node<'a, 'input>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(name))
}

fn xml_number(node: &roxmltree::Node, name: &str) -> Result<f64, InterchangeError> {
    let text = xml_child(node, name)
        .and_then(|child| child.text())
        .map(str::trim)
        .unwrap_or_default();
    if text.is_empty() {
        return Ok(0.0);
    }
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| {
            InterchangeError::InvalidValue(format!(
                "<{}> must be a finite number, got `{}` (line {})",
                name,
                text,
                node.document().text_pos_at(node.range().start).row
            ))
        })
}

/// Reads `orbit` nodes from the `orbits` node of a KDL document.
pub fn orbits_from_kdl(input: &str) -> Result<Vec<OrbitSpec>, InterchangeError> {
    let doc: KdlDocument = input
        .parse()
        .map_err(|e: kdl::KdlError| InterchangeError::Parse(e.to_string()))?;

    let list = doc
        .get("orbits")
        .ok_or_else(|| InterchangeError::InvalidStructure("missing 'orbits' node".into()))?;

    let mut orbits = Vec::new();
    for node in list.children().iter().flat_map(|c| c.nodes()) {
        match node.name().value() {
            "orbit" => orbits.push(orbit_from_kdl(node)?),
            other => {
                return Err(InterchangeError::InvalidStructure(format!(
                    "unexpected node in orbit list: {}",
                    other
                )))
            }
        }
    }
    Ok(orbits)
}

fn orbit_from_kdl(node: &KdlNode) -> Result<OrbitSpec, InterchangeError> {
    let title = node
        .entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .unwrap_or_default()
        .to_string();

    let translation = match node.children().and_then(|c| c.get("translation")) {
        Some(translation) => Translation {
            x: kdl_number(translation, "x")?,
            y: kdl_number(translation, "y")?,
        },
        None => Translation::default(),
    };

    Ok(OrbitSpec {
        title,
        r1: kdl_number(node, "r1")?,
        r2: kdl_number(node, "r2")?,
        zero_delta: kdl_number(node, "zero_delta")?,
        rotation: kdl_number(node, "rotation")?,
        translation,
        title_angle: kdl_number(node, "title_angle")?,
    })
}

fn kdl_number(node: &KdlNode, name: &str) -> Result<f64, InterchangeError> {
    match node.get(name) {
        None => Ok(0.0),
        Some(value) => as_number(value).ok_or_else(|| {
            InterchangeError::InvalidValue(format!(
                "`{}` on `{}` must be a finite number",
                name,
                node.name().value()
            ))
        }),
    }
}

fn as_number(value: &KdlValue) -> Option<f64> {
    value
        .as_float()
        .or_else(|| value.as_integer().map(|v| v as f64))
        .filter(|value| value.is_finite())
}

/// Serialize an orbit list to KDL.
pub fn orbits_to_kdl(orbits: &[OrbitSpec]) -> String {
    let mut doc = KdlDocument::new();
    let mut list = KdlNode::new("orbits");
    let children = list.children_mut().get_or_insert_with(KdlDocument::new);

    for spec in orbits {
        let mut node = KdlNode::new("orbit");
        node.push(KdlEntry::new(spec.title.clone()));
        node.push(KdlEntry::new_prop("r1", spec.r1));
        node.push(KdlEntry::new_prop("r2", spec.r2));
        node.push(KdlEntry::new_prop("zero_delta", spec.zero_delta));
        node.push(KdlEntry::new_prop("rotation", spec.rotation));
        node.push(KdlEntry::new_prop("title_angle", spec.title_angle));

        if spec.translation != Translation::default() {
            let mut translation = KdlNode::new("translation");
            translation.push(KdlEntry::new_prop("x", spec.translation.x));
            translation.push(KdlEntry::new_prop("y", spec.translation.y));
            node.children_mut()
                .get_or_insert_with(KdlDocument::new)
                .nodes_mut()
                .push(translation);
        }
        children.nodes_mut().push(node);
    }

    doc.nodes_mut().push(list);
    doc.autoformat();
    doc.to_string()
}
