//! Compositor graph system.
//!
//! The compositor executes rendering as a graph of named nodes. Each node
//! type declares its own dependencies, and the graph is deduced from a
//! single final node: building walks the dependency chains depth-first,
//! producing a topologically ordered node list where diamond-shaped
//! dependencies resolve to one shared instance.
//!
//! Execution walks that list in order. The scheduler tracks the last index
//! at which each node's output is consumed, and calls `clear()` on the node
//! as soon as that index has rendered, so transient resources are returned
//! to their pool at the earliest safe point of every frame.
//!
//! The compositor is generic over an opaque context type `C` (per-frame
//! view state, settings, resource pools); it never inspects the context,
//! only threads it through dependency queries and render calls.

pub mod graph;
pub mod node;
pub mod registry;

pub use graph::CompositorGraph;
pub use node::{CompositorNode, NodeDefinition, NodeId, NodeInputs};
pub use registry::{NodeType, NodeTypeRegistry, SealedNodeRegistry};
