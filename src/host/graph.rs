//! Host graph capability
//!
//! The host application owns the node graph; this crate only ever talks to
//! it through `HostGraph`. Callers hand in a concrete implementation, so
//! there is no ambient global to reach for and tests can swap in
//! [`MemGraph`](crate::host::mem::MemGraph).

use thiserror::Error;

use crate::core::model::NodeId;

/// Failures raised by the host graph itself
///
/// Any of these aborts the operation that hit it; the library maps them
/// into its own error type at the call site.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("node not found: {0}")]
    NodeMissing(NodeId),

    #[error("node {node} has no parameter named {parm}")]
    ParmMissing { node: NodeId, parm: String },

    #[error("host backend failure: {0}")]
    Backend(String),
}

/// Capability interface to the host application's node graph
///
/// Object-safe and synchronous. Host state is shared outside this crate,
/// so every method takes `&self`; implementations use interior mutability
/// for writes.
pub trait HostGraph {
    /// Every node in the graph, in the host's root-down traversal order
    fn nodes(&self) -> Result<Vec<NodeId>, HostError>;

    /// Type name of a node
    fn type_name(&self, node: &NodeId) -> Result<String, HostError>;

    /// Instance name of a node
    fn node_name(&self, node: &NodeId) -> Result<String, HostError>;

    /// Evaluate a string parameter
    fn eval_parm(&self, node: &NodeId, parm: &str) -> Result<String, HostError>;

    /// Write a string parameter
    fn set_parm(&self, node: &NodeId, parm: &str, value: &str) -> Result<(), HostError>;

    /// Make a node the host's current selection
    ///
    /// With `exclusive` set, any previous selection is cleared first.
    fn set_selected(&self, node: &NodeId, exclusive: bool) -> Result<(), HostError>;
}
