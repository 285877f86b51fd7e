//! Frame Compositor - a dependency-driven frame graph scheduler
//!
//! The compositor turns a registry of named node types into an ordered,
//! deduplicated, cycle-free execution graph rooted at a single final node,
//! then drives per-frame execution while releasing each node's transient
//! resources at the earliest safe point (right after its last consumer ran).
//!
//! # Features
//! - Node types declare their own dependencies, which may vary with runtime
//!   settings; the graph is rebuilt whenever those settings change shape
//! - Diamond-shaped dependencies share a single node instance per graph
//! - Cycle and unknown-type detection with clean teardown of partial builds
//! - Liveness tracking: a node is reclaimed immediately after the last node
//!   that depends on it has rendered
//!
//! # Example
//!
//! ```ignore
//! let mut registry = NodeTypeRegistry::new();
//! registry.register::<SceneDepthNode>();
//! registry.register::<BasePassNode>();
//! registry.register::<LightingNode>();
//! registry.register::<FinalOutputNode>();
//! let registry = registry.seal();
//!
//! let mut graph = CompositorGraph::new();
//! graph.build(&registry, &view, FinalOutputNode::ID)?;
//!
//! // Once per frame:
//! graph.execute(&view);
//! ```

pub mod compositor;
pub mod error;

pub use compositor::{
    CompositorGraph, CompositorNode, NodeDefinition, NodeId, NodeInputs, NodeType,
    NodeTypeRegistry, SealedNodeRegistry,
};
pub use error::BuildError;
