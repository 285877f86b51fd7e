//! Compositor error types.

use crate::compositor::NodeId;
use thiserror::Error;

/// Errors produced while building a compositor graph.
///
/// All build failures are local to the failing `build` call: the graph is
/// left empty and invalid, every node instance created during the aborted
/// attempt has been cleared, and the registry is untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// The build referenced an identifier with no registered node type.
    #[error("unknown compositor node type \"{0}\"")]
    UnknownNodeType(NodeId),
    /// A dependency chain revisited a node that is still being registered.
    #[error("cyclic dependency: node \"{dependent}\" depends on node \"{id}\" which is not available at this stage")]
    CyclicDependency {
        /// The node that was revisited while still in progress.
        id: NodeId,
        /// The node whose dependency list re-triggered it.
        dependent: NodeId,
    },
}
