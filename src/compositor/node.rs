//! Node identity and the node capability contract.

use std::any::Any;
use std::fmt;

/// Unique identifier for a compositor node type.
///
/// `NodeId` wraps an interned static name and is `Copy`, so it is cheap to
/// pass around and compare. Two ids are equal iff their names are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(&'static str);

impl NodeId {
    /// Create a node id from a static name.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The underlying name.
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A node in the compositor graph.
///
/// Nodes perform one rendering task per frame and own whatever transient
/// resources they acquire while doing so. The scheduler drives the
/// lifecycle: `render` is called once per frame in dependency order, and
/// `clear` is called as soon as the last node that consumes this node's
/// output has rendered.
///
/// Resource acquisition belongs in `render`, not in construction; `clear`
/// must release everything acquired since the previous `render` and must be
/// a no-op on a freshly created, never-rendered node.
pub trait CompositorNode<C> {
    /// Executes the task implemented in the node.
    ///
    /// `inputs` holds the node's resolved dependencies, in the order the
    /// type declared them; each has already rendered this frame, so their
    /// published outputs are readable via [`NodeInputs::downcast_ref`].
    fn render(&mut self, context: &C, inputs: &NodeInputs<'_, C>);

    /// Releases temporary resources allocated in a `render` call.
    ///
    /// Anything meant to outlive one frame must be kept alive and released
    /// through some other channel.
    fn clear(&mut self);

    /// Allow dependants to downcast this node and read its outputs.
    fn as_any(&self) -> &dyn Any;
}

/// Static description of a node type: its identity, dependency query, and
/// default construction.
///
/// Implementing this trait is the usual way to make a node registrable via
/// [`NodeTypeRegistry::register`](crate::compositor::NodeTypeRegistry::register).
/// The dependency query is associated with the *type*, not an instance: it
/// runs during graph building, before any instance exists.
pub trait NodeDefinition<C>: CompositorNode<C> + Default + 'static {
    /// Identifier of this node type.
    const ID: NodeId;

    /// Identifiers of the nodes this type depends on.
    ///
    /// The result may differ between builds (it can consult runtime state
    /// in `context`), but must be stable for the duration of one build.
    fn dependencies(context: &C) -> Vec<NodeId>;
}

/// Resolved dependencies handed to a node's `render` call.
///
/// Entries appear in the order the node type declared them and reference
/// sibling nodes that have already rendered this frame.
pub struct NodeInputs<'a, C> {
    nodes: Vec<&'a dyn CompositorNode<C>>,
}

impl<'a, C> NodeInputs<'a, C> {
    pub(crate) fn new(nodes: Vec<&'a dyn CompositorNode<C>>) -> Self {
        Self { nodes }
    }

    /// Number of resolved dependencies.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the node declared no dependencies.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a dependency by declaration position.
    pub fn get(&self, index: usize) -> Option<&'a dyn CompositorNode<C>> {
        self.nodes.get(index).copied()
    }

    /// Get a dependency downcast to its concrete node type.
    ///
    /// Returns `None` when the index is out of range or the node at that
    /// position is not an `N`.
    pub fn downcast_ref<N: 'static>(&self, index: usize) -> Option<&'a N> {
        self.get(index)?.as_any().downcast_ref::<N>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_identity() {
        let a = NodeId::new("SceneDepth");
        let b = NodeId::new("SceneDepth");
        let c = NodeId::new("BasePass");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.name(), "SceneDepth");
        assert_eq!(a.to_string(), "SceneDepth");
    }

    #[test]
    fn empty_inputs() {
        let inputs: NodeInputs<'_, ()> = NodeInputs::new(Vec::new());
        assert!(inputs.is_empty());
        assert_eq!(inputs.len(), 0);
        assert!(inputs.get(0).is_none());
    }
}
