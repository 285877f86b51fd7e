//! Graph construction, execution, and teardown.

use std::collections::HashMap;

use crate::compositor::node::{CompositorNode, NodeId, NodeInputs};
use crate::compositor::registry::SealedNodeRegistry;
use crate::error::BuildError;

/// Bookkeeping for a single node in a built graph.
///
/// The graph's node list is the sole owner of every instance; dependencies
/// are stored as indices into earlier positions of that list, which makes
/// the topological order an arena invariant rather than a runtime check.
struct GraphNode<C> {
    type_id: NodeId,
    instance: Box<dyn CompositorNode<C>>,
    /// Indices of this node's dependencies; always smaller than this
    /// node's own index.
    dependencies: Vec<usize>,
    /// Index of the last node that consumes this node's output. `None`
    /// means only the implicit end-of-frame consumer needs it.
    last_use: Option<usize>,
    /// Set at construction and at render, dropped when the node's
    /// transient resources are reclaimed.
    active: bool,
}

/// An ordered, deduplicated, acyclic graph of compositor nodes.
///
/// Built from a single final node by walking the dependency chains
/// declared in a [`SealedNodeRegistry`]. A graph stays reusable across
/// frames until the dependency shape changes, at which point `build` may
/// be called again; the previous nodes are torn down first.
///
/// A failed build leaves the graph empty and invalid; `execute` and
/// `clear` on an invalid graph are deliberate no-ops.
pub struct CompositorGraph<C> {
    nodes: Vec<GraphNode<C>>,
    valid: bool,
}

impl<C> CompositorGraph<C> {
    /// Create an empty, invalid graph.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            valid: false,
        }
    }

    /// Whether the last `build` succeeded.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Node type ids in execution order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|node| node.type_id)
    }

    /// Resolved dependency indices of a node, in declaration order.
    pub fn dependency_indices_of(&self, id: NodeId) -> Option<&[usize]> {
        self.nodes
            .iter()
            .find(|node| node.type_id == id)
            .map(|node| node.dependencies.as_slice())
    }

    /// The last execution index at which a node's output is consumed.
    ///
    /// `None` for the final node (nothing depends on it) and for ids not
    /// present in the graph.
    pub fn last_use_of(&self, id: NodeId) -> Option<usize> {
        self.nodes
            .iter()
            .find(|node| node.type_id == id)
            .and_then(|node| node.last_use)
    }

    /// Rebuild the node graph rooted at `final_node`.
    ///
    /// Any previously built nodes are cleared and discarded first, so
    /// `build` may be called whenever a setting that influences node
    /// dependencies changes. The dependency queries run against `context`
    /// and must return stable results for the duration of this call.
    ///
    /// On failure the graph is left empty and invalid, every node instance
    /// created during the attempt has been cleared, and the error is
    /// returned for the caller to inspect.
    pub fn build(
        &mut self,
        registry: &SealedNodeRegistry<C>,
        context: &C,
        final_node: NodeId,
    ) -> Result<(), BuildError> {
        self.clear();

        let mut builder = GraphBuilder {
            registry,
            context,
            nodes: Vec::new(),
            processed: HashMap::new(),
        };

        match builder.register(final_node, None) {
            Ok(_) => {
                self.nodes = builder.nodes;
                self.valid = true;
                log::debug!(
                    "compositor graph built: {} nodes rooted at \"{}\"",
                    self.nodes.len(),
                    final_node
                );
                Ok(())
            }
            Err(err) => {
                // Partially created nodes hold no resources that depend on
                // each other, so teardown order does not matter.
                for node in &mut builder.nodes {
                    node.instance.clear();
                }
                log::error!("compositor graph build failed: {err}");
                Err(err)
            }
        }
    }

    /// Execute one frame.
    ///
    /// Renders every node in order, handing each the already-rendered
    /// nodes it depends on. After each render, every node whose last
    /// consumer has now run is cleared, and the final node is cleared
    /// unconditionally at the end of the frame.
    ///
    /// Does nothing on an invalid graph.
    pub fn execute(&mut self, context: &C) {
        if !self.valid {
            return;
        }

        for index in 0..self.nodes.len() {
            {
                let (earlier, rest) = self.nodes.split_at_mut(index);
                let node = &mut rest[0];

                log::trace!("compositor: rendering node \"{}\"", node.type_id);

                let inputs = NodeInputs::new(
                    node.dependencies
                        .iter()
                        .map(|&dep| &*earlier[dep].instance)
                        .collect(),
                );

                node.active = true;
                node.instance.render(context, &inputs);
            }

            for node in &mut self.nodes[..=index] {
                if node.active && matches!(node.last_use, Some(last) if last <= index) {
                    node.instance.clear();
                    node.active = false;
                }
            }
        }

        // The final node has no consumers, but its transient resources
        // must not leak into the next frame.
        if let Some(last) = self.nodes.last_mut() {
            if last.active {
                last.instance.clear();
                last.active = false;
            }
        }
    }

    /// Tear the graph down.
    ///
    /// Clears every node that still holds transient resources (nodes
    /// already reclaimed during the frame are skipped), then discards the
    /// node list and marks the graph invalid.
    pub fn clear(&mut self) {
        for node in &mut self.nodes {
            if node.active {
                node.instance.clear();
                node.active = false;
            }
        }
        self.nodes.clear();
        self.valid = false;
    }
}

impl<C> Default for CompositorGraph<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Drop for CompositorGraph<C> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Identifier states tracked while registering nodes.
enum Slot {
    /// Dependency walk entered this node but has not finished it; hitting
    /// this state again means the chain is cyclic.
    InProgress,
    /// Node registered at this index.
    Done(usize),
}

struct GraphBuilder<'a, C> {
    registry: &'a SealedNodeRegistry<C>,
    context: &'a C,
    nodes: Vec<GraphNode<C>>,
    processed: HashMap<NodeId, Slot>,
}

impl<C> GraphBuilder<'_, C> {
    /// Register `id` and, depth-first, everything it depends on.
    ///
    /// Returns the node's index in the execution order. Memoized: a node
    /// already registered returns its index immediately without re-querying
    /// its dependencies, which is what deduplicates diamond dependencies.
    fn register(&mut self, id: NodeId, dependent: Option<NodeId>) -> Result<usize, BuildError> {
        match self.processed.get(&id) {
            Some(Slot::Done(index)) => return Ok(*index),
            Some(Slot::InProgress) => {
                return Err(BuildError::CyclicDependency {
                    id,
                    dependent: dependent.unwrap_or(id),
                });
            }
            None => {}
        }

        let node_type = self
            .registry
            .lookup(id)
            .ok_or(BuildError::UnknownNodeType(id))?;

        self.processed.insert(id, Slot::InProgress);

        let dependency_ids = node_type.dependencies_of(self.context);
        let mut dependencies = Vec::with_capacity(dependency_ids.len());
        for dep_id in dependency_ids {
            dependencies.push(self.register(dep_id, Some(id))?);
        }

        let index = self.nodes.len();
        for &dep in &dependencies {
            let dep_node = &mut self.nodes[dep];
            dep_node.last_use = Some(dep_node.last_use.map_or(index, |last| last.max(index)));
        }

        self.nodes.push(GraphNode {
            type_id: id,
            instance: node_type.instantiate(),
            dependencies,
            last_use: None,
            active: true,
        });
        self.processed.insert(id, Slot::Done(index));

        Ok(index)
    }
}
