//! Deep copies of layer subtrees

use crate::{LayerId, SceneError, SceneGraph};

impl SceneGraph {
    /// Copies `prototype` and everything below it into `destination`.
    ///
    /// The copy keeps the prototype's name and opacity. Child layers are
    /// cloned first, in order, then items are duplicated back to front so the
    /// copy lists them in the prototype's order. Finally the copy is sent one
    /// step backward, which keeps a run of clones into the same parent
    /// stacking consistently.
    ///
    /// The copy shares no geometry with the prototype.
    pub fn clone_layer(
        &mut self,
        prototype: LayerId,
        destination: LayerId,
    ) -> Result<LayerId, SceneError> {
        let source = self.require(prototype)?;
        let name = source.name().to_string();
        let opacity = source.opacity();
        let children = source.children().to_vec();
        let items = source.items().to_vec();

        let copy = self.create_named_layer(destination, name)?;
        if let Some(layer) = self.layer_mut(copy) {
            layer.set_opacity(opacity);
        }

        for child in children {
            self.clone_layer(child, copy)?;
        }

        for item in items.iter().rev() {
            self.duplicate_item(item, copy)?;
        }

        self.send_backward(copy)?;

        log::trace!("cloned layer {} into {}", self.path(prototype), self.path(copy));
        Ok(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Item;
    use glam::DVec2;

    fn prototype(graph: &mut SceneGraph) -> LayerId {
        let root = graph.root();
        let prototype = graph.create_named_layer(root, "Anchor").unwrap();
        graph.layer_mut(prototype).unwrap().set_opacity(40.0);
        let inner = graph.create_named_layer(prototype, "Inner").unwrap();

        let layer = graph.layer_mut(prototype).unwrap();
        layer.push_item(Item::rect(DVec2::ZERO, DVec2::ONE).with_name("front"));
        layer.push_item(Item::ellipse(DVec2::ZERO, DVec2::ONE).with_name("back"));
        graph
            .layer_mut(inner)
            .unwrap()
            .push_item(Item::rect(DVec2::new(2.0, 2.0), DVec2::ONE));
        prototype
    }

    #[test]
    fn test_clone_preserves_structure() {
        let mut graph = SceneGraph::new();
        let prototype = prototype(&mut graph);
        let destination = graph.create_named_layer(graph.root(), "Dest").unwrap();

        let copy = graph.clone_layer(prototype, destination).unwrap();

        let original = graph.layer(prototype).unwrap();
        let cloned = graph.layer(copy).unwrap();
        assert_eq!(cloned.name(), "Anchor");
        assert_eq!(cloned.opacity(), 40.0);
        assert_eq!(cloned.children().len(), original.children().len());
        assert_eq!(cloned.items(), original.items());
        assert_eq!(graph.item_count(copy), graph.item_count(prototype));
        assert_eq!(graph.parent(copy), Some(destination));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut graph = SceneGraph::new();
        let prototype = prototype(&mut graph);
        let destination = graph.create_layer(graph.root()).unwrap();
        let before = graph.bounds(prototype);

        let copy = graph.clone_layer(prototype, destination).unwrap();
        graph.translate(copy, DVec2::new(50.0, 50.0));
        graph.scale(copy, 3.0, 3.0);

        assert_eq!(graph.bounds(prototype), before);
    }

    #[test]
    fn test_clone_stacking_order() {
        let mut graph = SceneGraph::new();
        let prototype = prototype(&mut graph);
        let destination = graph.create_layer(graph.root()).unwrap();

        let first = graph.clone_layer(prototype, destination).unwrap();
        let second = graph.clone_layer(prototype, destination).unwrap();
        let third = graph.clone_layer(prototype, destination).unwrap();

        // Each clone lands at the front and is then sent one step back.
        assert_eq!(graph.children(destination), &[first, third, second]);
    }
}
