//! # Scene Graph
//!
//! The scene graph is the in-memory host document that orbit diagrams are
//! assembled into. It mirrors the layer model of a vector editing host:
//!
//! - **Layers**: named nodes with an opacity, an ordered list of child layers
//!   and an ordered list of visual items.
//! - **Items**: leaf geometry placed in document space (see [`item`]).
//! - **Draw order**: children and items are stored front-to-back. Index `0`
//!   is the frontmost entry, the one drawn last.
//!
//! Layers have no position of their own. A layer's geometry is purely the
//! union of the items in its subtree, and every geometric operation in
//! [`transform`] walks that subtree and rewrites the items.
//!
//! The graph is an arena keyed by [`LayerId`], so subtrees can be cloned and
//! mutated without shared ownership between them.

pub mod clone;
pub mod item;
pub mod transform;

pub use item::{Item, Shape, TextPath};

use slotmap::{KeyData, SlotMap};
use std::fmt::{self, Display};

slotmap::new_key_type! {
    /// Defines a unique identifier for layers within the scene graph.
    pub struct LayerId;
}

impl LayerId {
    /// Converts this layer id to a [u64]
    pub fn as_u64(self) -> u64 {
        self.0.as_ffi()
    }
}

impl From<u64> for LayerId {
    fn from(value: u64) -> Self {
        Self(KeyData::from_ffi(value))
    }
}

impl Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u64())
    }
}

/// Errors raised by structural scene graph operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("layer {0} does not exist")]
    LayerNotFound(LayerId),

    #[error("item is not a text frame")]
    NotText,
}

/// Name given to the root layer, which stands for the document itself.
pub const DOCUMENT_LAYER_NAME: &str = "document";

/// SceneGraph owns every layer of a document.
///
/// The root layer represents the document; its children are the document's
/// top-level layers. Structural operations follow the host's semantics:
/// [`SceneGraph::create_layer`] inserts at the front of the parent,
/// [`SceneGraph::send_backward`] moves a layer one step back, and
/// [`SceneGraph::duplicate_item`] inserts at the front of the target layer.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    /// The document layer
    root: LayerId,

    /// Storage for all layers, indexed by their IDs
    layers: SlotMap<LayerId, Layer>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Creates an empty document
    pub fn new() -> Self {
        let mut layers = SlotMap::with_key();
        let root = layers.insert(Layer::new(DOCUMENT_LAYER_NAME));
        Self { root, layers }
    }

    /// Returns the ID of the document layer
    pub fn root(&self) -> LayerId {
        self.root
    }

    /// Number of layers, including the document layer
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns true when the document holds nothing but its root.
    pub fn is_empty(&self) -> bool {
        self.layers.len() == 1
    }

    /// Get a reference to a layer by its ID
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(id)
    }

    /// Get a mutable reference to a layer by its ID
    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.get_mut(id)
    }

    /// Like [`SceneGraph::layer`], but a missing layer is an error.
    pub fn require(&self, id: LayerId) -> Result<&Layer, SceneError> {
        self.layers.get(id).ok_or(SceneError::LayerNotFound(id))
    }

    fn require_mut(&mut self, id: LayerId) -> Result<&mut Layer, SceneError> {
        self.layers.get_mut(id).ok_or(SceneError::LayerNotFound(id))
    }

    /// Gets the children of a layer, frontmost first
    pub fn children(&self, id: LayerId) -> &[LayerId] {
        self.layers
            .get(id)
            .map(|layer| layer.children.as_slice())
            .unwrap_or_default()
    }

    /// Gets the parent of a layer
    pub fn parent(&self, id: LayerId) -> Option<LayerId> {
        self.layers.get(id).and_then(|layer| layer.parent)
    }

    /// Creates an unnamed layer at the front of `parent`.
    pub fn create_layer(&mut self, parent: LayerId) -> Result<LayerId, SceneError> {
        self.require(parent)?;

        let mut layer = Layer::new("");
        layer.parent = Some(parent);
        let id = self.layers.insert(layer);

        self.require_mut(parent)?.children.insert(0, id);
        Ok(id)
    }

    /// Creates a named layer at the front of `parent`.
    pub fn create_named_layer(
        &mut self,
        parent: LayerId,
        name: impl Into<String>,
    ) -> Result<LayerId, SceneError> {
        let id = self.create_layer(parent)?;
        self.require_mut(id)?.name = name.into();
        Ok(id)
    }

    /// Finds the first direct child of `parent` called `name`.
    pub fn find_layer_by_name(&self, parent: LayerId, name: &str) -> Option<LayerId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self.layers.get(child).is_some_and(|layer| layer.name == name))
    }

    /// Moves a layer one step back among its siblings.
    ///
    /// A layer that is already the backmost (or has no parent) stays put.
    pub fn send_backward(&mut self, id: LayerId) -> Result<(), SceneError> {
        let Some(parent) = self.require(id)?.parent else {
            return Ok(());
        };
        let siblings = &mut self.require_mut(parent)?.children;
        if let Some(index) = siblings.iter().position(|&sibling| sibling == id) {
            if index + 1 < siblings.len() {
                siblings.swap(index, index + 1);
            }
        }
        Ok(())
    }

    /// Moves a layer in front of all of its siblings.
    pub fn bring_to_front(&mut self, id: LayerId) -> Result<(), SceneError> {
        let Some(parent) = self.require(id)?.parent else {
            return Ok(());
        };
        let siblings = &mut self.require_mut(parent)?.children;
        if let Some(index) = siblings.iter().position(|&sibling| sibling == id) {
            let layer = siblings.remove(index);
            siblings.insert(0, layer);
        }
        Ok(())
    }

    /// Copies `item` to the front of the `into` layer.
    pub fn duplicate_item(&mut self, item: &Item, into: LayerId) -> Result<(), SceneError> {
        self.require_mut(into)?.items.insert(0, item.clone());
        Ok(())
    }

    /// Returns `id` followed by every layer below it, depth first.
    pub fn descendants(&self, id: LayerId) -> Vec<LayerId> {
        let mut layers = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(layer) = self.layers.get(current) {
                layers.push(current);
                stack.extend(layer.children.iter().rev());
            }
        }
        layers
    }

    /// Visits every item in the subtree rooted at `id`.
    pub fn for_each_item(&self, id: LayerId, mut f: impl FnMut(&Item)) {
        for layer_id in self.descendants(id) {
            if let Some(layer) = self.layers.get(layer_id) {
                layer.items.iter().for_each(&mut f);
            }
        }
    }

    /// Visits every item in the subtree rooted at `id` mutably.
    ///
    /// This is the single traversal all geometric operations are built on.
    pub fn for_each_item_mut(&mut self, id: LayerId, mut f: impl FnMut(&mut Item)) {
        for layer_id in self.descendants(id) {
            if let Some(layer) = self.layers.get_mut(layer_id) {
                layer.items.iter_mut().for_each(&mut f);
            }
        }
    }

    /// Counts the items in the subtree rooted at `id`.
    pub fn item_count(&self, id: LayerId) -> usize {
        let mut count = 0;
        self.for_each_item(id, |_| count += 1);
        count
    }

    /// Returns the names from the document layer down to `id`, joined by `/`.
    pub fn path(&self, id: LayerId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(layer_id) = current {
            if layer_id == self.root {
                break;
            }
            match self.layers.get(layer_id) {
                Some(layer) => {
                    names.push(layer.name.as_str());
                    current = layer.parent;
                }
                None => break,
            }
        }
        names.reverse();
        names.join("/")
    }
}

/// A named group of child layers and visual items.
#[derive(Debug, Clone)]
pub struct Layer {
    name: String,
    opacity: f64,

    /// Root layers have no parent (None)
    parent: Option<LayerId>,

    /// Child layers, frontmost first
    children: Vec<LayerId>,

    /// Items, frontmost first
    items: Vec<Item>,
}

impl Layer {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            opacity: 100.0,
            parent: None,
            children: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Opacity in percent, as the host reports it.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity;
    }

    pub fn parent(&self) -> Option<LayerId> {
        self.parent
    }

    /// Child layers, frontmost first
    pub fn children(&self) -> &[LayerId] {
        &self.children
    }

    /// Items owned directly by this layer, frontmost first
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Appends an item behind the existing ones.
    ///
    /// Loaders use this to rebuild a layer in stored order; assembly code
    /// goes through [`SceneGraph::duplicate_item`] instead.
    pub fn push_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// The first text frame owned directly by this layer.
    pub fn text_item_mut(&mut self) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.is_text())
    }
}
