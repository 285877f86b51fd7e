//! Registration of compositor node types.
//!
//! The registry has a two-phase lifecycle: a populate phase during process
//! or plugin initialization, and a read-only lookup phase entered by
//! [`NodeTypeRegistry::seal`]. Sealing is a type-level transition, so the
//! hot-path `lookup` needs no locking and cannot race with registration.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::compositor::node::{CompositorNode, NodeDefinition, NodeId};

/// Describes a registered node type: how to query its dependencies and how
/// to create an instance.
///
/// Most node types are registered through
/// [`NodeTypeRegistry::register`] and never construct this directly;
/// [`NodeType::new`] exists for closures that capture plugin state.
pub struct NodeType<C> {
    id: NodeId,
    dependencies: Box<dyn Fn(&C) -> Vec<NodeId>>,
    create: Box<dyn Fn() -> Box<dyn CompositorNode<C>>>,
}

impl<C> NodeType<C> {
    /// Describe a node type from explicit closures.
    pub fn new(
        id: NodeId,
        dependencies: impl Fn(&C) -> Vec<NodeId> + 'static,
        create: impl Fn() -> Box<dyn CompositorNode<C>> + 'static,
    ) -> Self {
        Self {
            id,
            dependencies: Box::new(dependencies),
            create: Box::new(create),
        }
    }

    /// Describe a node type from its [`NodeDefinition`].
    pub fn of<N: NodeDefinition<C>>() -> Self
    where
        C: 'static,
    {
        Self::new(N::ID, N::dependencies, || Box::new(N::default()))
    }

    /// Identifier of this node type.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Query the dependencies of a node of this type.
    pub(crate) fn dependencies_of(&self, context: &C) -> Vec<NodeId> {
        (self.dependencies)(context)
    }

    /// Create a new instance of this node type.
    pub(crate) fn instantiate(&self) -> Box<dyn CompositorNode<C>> {
        (self.create)()
    }
}

/// Mutable registry of node types, used during initialization.
///
/// Registration is expected to happen once per node type at startup;
/// registering the same id twice is a programmer error, logged and
/// rejected while the first registration stays in effect.
pub struct NodeTypeRegistry<C> {
    types: HashMap<NodeId, NodeType<C>>,
}

impl<C> NodeTypeRegistry<C> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Register a node type from its [`NodeDefinition`].
    pub fn register<N: NodeDefinition<C>>(&mut self)
    where
        C: 'static,
    {
        self.register_type(NodeType::of::<N>());
    }

    /// Register an explicitly constructed node type.
    pub fn register_type(&mut self, node_type: NodeType<C>) {
        match self.types.entry(node_type.id()) {
            Entry::Occupied(_) => {
                log::warn!(
                    "found two compositor node types with the same name \"{}\"; keeping the first",
                    node_type.id()
                );
            }
            Entry::Vacant(entry) => {
                entry.insert(node_type);
            }
        }
    }

    /// Number of registered node types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Finish the populate phase, producing a read-only registry.
    pub fn seal(self) -> SealedNodeRegistry<C> {
        SealedNodeRegistry { types: self.types }
    }
}

impl<C> Default for NodeTypeRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only registry of node types, consumed by graph building.
pub struct SealedNodeRegistry<C> {
    types: HashMap<NodeId, NodeType<C>>,
}

impl<C> SealedNodeRegistry<C> {
    /// Look up a node type by id.
    pub fn lookup(&self, id: NodeId) -> Option<&NodeType<C>> {
        self.types.get(&id)
    }

    /// True when a node type with this id is registered.
    pub fn contains(&self, id: NodeId) -> bool {
        self.types.contains_key(&id)
    }

    /// Number of registered node types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True when nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
