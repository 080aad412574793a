//! KDL documents backed by a [`SceneGraph`]

use std::path::Path;

use glam::{DAffine2, DMat2, DVec2};
use kdl::{KdlDocument, KdlEntry, KdlNode};
use scene_graph::{Item, Layer, LayerId, SceneGraph, Shape, TextPath};

use crate::{InterchangeError, FORMAT_VERSION};

/// A Starmap document that can be serialized to/from KDL.
#[derive(Debug, Clone)]
pub struct Document {
    pub version: String,
    pub scene: SceneGraph,
}

impl Document {
    pub fn new(scene: SceneGraph) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            scene,
        }
    }

    /// Read and parse a document file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InterchangeError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| InterchangeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = Self::from_kdl(&input)?;
        log::debug!(
            "loaded {} ({} layers)",
            path.display(),
            document.scene.len() - 1
        );
        Ok(document)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), InterchangeError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_kdl()).map_err(|source| InterchangeError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Serialize the document to a KDL string.
    pub fn to_kdl(&self) -> String {
        let mut doc = KdlDocument::new();

        let mut doc_node = KdlNode::new("document");
        doc_node.push(KdlEntry::new_prop("version", self.version.clone()));

        if let Some(root) = self.scene.layer(self.scene.root()) {
            if let Some(contents) = layer_contents(&self.scene, root) {
                *doc_node.children_mut() = Some(contents);
            }
        }

        doc.nodes_mut().push(doc_node);
        doc.autoformat();
        doc.to_string()
    }

    /// Parse a document from a KDL string.
    pub fn from_kdl(input: &str) -> Result<Self, InterchangeError> {
        let doc: KdlDocument = input
            .parse()
            .map_err(|e: kdl::KdlError| InterchangeError::Parse(e.to_string()))?;

        let doc_node = doc
            .get("document")
            .ok_or_else(|| InterchangeError::InvalidStructure("missing 'document' node".into()))?;

        let version = doc_node
            .get("version")
            .and_then(|v| v.as_string())
            .map(|s| s.to_string())
            .unwrap_or_else(|| FORMAT_VERSION.to_string());

        let mut scene = SceneGraph::new();
        if let Some(children) = doc_node.children() {
            let root = scene.root();
            read_contents(&mut scene, root, children)?;
        }

        Ok(Self { version, scene })
    }
}

/// Child layers followed by items, or `None` for an empty layer.
fn layer_contents(scene: &SceneGraph, layer: &Layer) -> Option<KdlDocument> {
    let mut contents = KdlDocument::new();
    for child in layer.children().iter().filter_map(|&id| scene.layer(id)) {
        contents.nodes_mut().push(layer_to_kdl(scene, child));
    }
    for item in layer.items() {
        contents.nodes_mut().push(item_to_kdl(item));
    }
    (!contents.nodes().is_empty()).then_some(contents)
}

fn layer_to_kdl(scene: &SceneGraph, layer: &Layer) -> KdlNode {
    let mut node = KdlNode::new("layer");
    node.push(KdlEntry::new(layer.name().to_string()));
    if layer.opacity() != 100.0 {
        node.push(KdlEntry::new_prop("opacity", layer.opacity()));
    }
    *node.children_mut() = layer_contents(scene, layer);
    node
}

fn item_to_kdl(item: &Item) -> KdlNode {
    let mut node = match &item.shape {
        Shape::Rect { origin, size } => {
            let mut node = KdlNode::new("rect");
            node.push(KdlEntry::new_prop("x", origin.x));
            node.push(KdlEntry::new_prop("y", origin.y));
            node.push(KdlEntry::new_prop("width", size.x));
            node.push(KdlEntry::new_prop("height", size.y));
            node
        }
        Shape::Ellipse { center, radii } => {
            let mut node = KdlNode::new("ellipse");
            push_ellipse(&mut node, *center, *radii);
            node
        }
        Shape::Path { points, closed } => {
            let mut node = KdlNode::new("path");
            if *closed {
                node.push(KdlEntry::new_prop("closed", true));
            }
            for point in points {
                let mut point_node = KdlNode::new("point");
                point_node.push(KdlEntry::new_prop("x", point.x));
                point_node.push(KdlEntry::new_prop("y", point.y));
                push_child(&mut node, point_node);
            }
            node
        }
        Shape::Text(text) => {
            let mut node = KdlNode::new("text");
            node.push(KdlEntry::new(text.contents.clone()));
            push_ellipse(&mut node, text.center, text.radii);
            node.push(KdlEntry::new_prop("start", text.start_t));
            node.push(KdlEntry::new_prop("end", text.end_t));
            node
        }
    };

    if let Some(name) = &item.name {
        node.push(KdlEntry::new_prop("name", name.clone()));
    }

    if item.transform != DAffine2::IDENTITY {
        let m = item.transform;
        let mut transform = KdlNode::new("transform");
        transform.push(KdlEntry::new_prop("a", m.matrix2.x_axis.x));
        transform.push(KdlEntry::new_prop("b", m.matrix2.x_axis.y));
        transform.push(KdlEntry::new_prop("c", m.matrix2.y_axis.x));
        transform.push(KdlEntry::new_prop("d", m.matrix2.y_axis.y));
        transform.push(KdlEntry::new_prop("e", m.translation.x));
        transform.push(KdlEntry::new_prop("f", m.translation.y));
        push_child(&mut node, transform);
    }

    node
}

fn push_ellipse(node: &mut KdlNode, center: DVec2, radii: DVec2) {
    node.push(KdlEntry::new_prop("cx", center.x));
    node.push(KdlEntry::new_prop("cy", center.y));
    node.push(KdlEntry::new_prop("rx", radii.x));
    node.push(KdlEntry::new_prop("ry", radii.y));
}

fn push_child(node: &mut KdlNode, child: KdlNode) {
    node.children_mut()
        .get_or_insert_with(KdlDocument::new)
        .nodes_mut()
        .push(child);
}

/// Rebuilds the layers and items listed in `contents` under `parent`.
fn read_contents(
    scene: &mut SceneGraph,
    parent: LayerId,
    contents: &KdlDocument,
) -> Result<(), InterchangeError> {
    // New layers go to the front, so create them back to front.
    for node in contents.nodes().iter().rev() {
        if node.name().value() == "layer" {
            read_layer(scene, parent, node)?;
        }
    }

    let mut items = Vec::new();
    for node in contents.nodes() {
        if node.name().value() != "layer" {
            items.push(read_item(node)?);
        }
    }
    if let Some(layer) = scene.layer_mut(parent) {
        for item in items {
            layer.push_item(item);
        }
    }
    Ok(())
}

fn read_layer(
    scene: &mut SceneGraph,
    parent: LayerId,
    node: &KdlNode,
) -> Result<(), InterchangeError> {
    let name = argument(node)
        .ok_or_else(|| InterchangeError::MissingField("layer name".into()))?;
    let id = scene
        .create_named_layer(parent, name)
        .map_err(|e| InterchangeError::InvalidStructure(e.to_string()))?;

    if let Some(opacity) = number(node, "opacity")? {
        if let Some(layer) = scene.layer_mut(id) {
            layer.set_opacity(opacity);
        }
    }

    if let Some(children) = node.children() {
        read_contents(scene, id, children)?;
    }
    Ok(())
}

fn read_item(node: &KdlNode) -> Result<Item, InterchangeError> {
    let shape = match node.name().value() {
        "rect" => Shape::Rect {
            origin: DVec2::new(number_or(node, "x", 0.0)?, number_or(node, "y", 0.0)?),
            size: DVec2::new(required(node, "width")?, required(node, "height")?),
        },
        "ellipse" => {
            let (center, radii) = read_ellipse(node)?;
            Shape::Ellipse { center, radii }
        }
        "path" => {
            let closed = match node.get("closed") {
                None => false,
                Some(value) => value.as_bool().ok_or_else(|| {
                    InterchangeError::InvalidValue("`closed` on `path` must be a boolean".into())
                })?,
            };
            let mut points = Vec::new();
            for point in node.children().iter().flat_map(|c| c.nodes()) {
                if point.name().value() == "point" {
                    points.push(DVec2::new(required(point, "x")?, required(point, "y")?));
                }
            }
            Shape::Path { points, closed }
        }
        "text" => {
            let (center, radii) = read_ellipse(node)?;
            let mut text = TextPath::new(argument(node).unwrap_or_default(), center, radii);
            text.start_t = number_or(node, "start", text.start_t)?;
            text.end_t = number_or(node, "end", text.end_t)?;
            Shape::Text(text)
        }
        other => {
            return Err(InterchangeError::InvalidValue(format!(
                "unknown item type: {}",
                other
            )))
        }
    };

    let mut item = Item::new(shape);

    if let Some(name) = node.get("name") {
        let name = name.as_string().ok_or_else(|| {
            InterchangeError::InvalidValue("item `name` must be a string".into())
        })?;
        item.name = Some(name.to_string());
    }

    if let Some(transform) = node.children().and_then(|c| c.get("transform")) {
        item.transform = DAffine2::from_mat2_translation(
            DMat2::from_cols(
                DVec2::new(required(transform, "a")?, required(transform, "b")?),
                DVec2::new(required(transform, "c")?, required(transform, "d")?),
            ),
            DVec2::new(required(transform, "e")?, required(transform, "f")?),
        );
    }

    Ok(item)
}

fn read_ellipse(node: &KdlNode) -> Result<(DVec2, DVec2), InterchangeError> {
    Ok((
        DVec2::new(number_or(node, "cx", 0.0)?, number_or(node, "cy", 0.0)?),
        DVec2::new(required(node, "rx")?, required(node, "ry")?),
    ))
}

/// The first positional string argument of `node`.
fn argument(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn number(node: &KdlNode, name: &str) -> Result<Option<f64>, InterchangeError> {
    let Some(value) = node.get(name) else {
        return Ok(None);
    };
    value
        .as_float()
        .or_else(|| value.as_integer().map(|v| v as f64))
        .filter(|value| value.is_finite())
        .map(Some)
        .ok_or_else(|| {
            InterchangeError::InvalidValue(format!(
                "`{}` on `{}` must be a finite number",
                name,
                node.name().value()
            ))
        })
}

fn number_or(node: &KdlNode, name: &str, default: f64) -> Result<f64, InterchangeError> {
    Ok(number(node, name)?.unwrap_or(default))
}

fn required(node: &KdlNode, name: &str) -> Result<f64, InterchangeError> {
    number(node, name)?.ok_or_else(|| {
        InterchangeError::MissingField(format!("`{}` on `{}`", name, node.name().value()))
    })
}
