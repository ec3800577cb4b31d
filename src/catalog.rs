//! Node catalog
//!
//! Finds the cache-writing nodes in the host graph. A node qualifies when
//! its type name has an entry in the parameter map, which also names the
//! string parameter holding that type's cache path.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::core::model::CacheNode;
use crate::error::Result;
use crate::host::graph::HostGraph;

/// Built-in entries for stock cache node types
const BUILTIN_PARAMS: &[(&str, &str)] = &[
    ("filecache", "file"),
    ("alembic", "fileName"),
    ("rop_alembic", "filename"),
];

/// Mapping from node type name to its cache path parameter
///
/// Passed explicitly to every operation that reads or writes cache paths.
/// Extend it per instance for site-specific node types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamMap {
    entries: HashMap<String, String>,
}

impl Default for ParamMap {
    fn default() -> Self {
        let entries = BUILTIN_PARAMS
            .iter()
            .map(|(node_type, parm)| (node_type.to_string(), parm.to_string()))
            .collect();
        Self { entries }
    }
}

impl ParamMap {
    /// Map with the built-in entries
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Map with no entries at all
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Add or override an entry
    pub fn with_entry(mut self, node_type: impl Into<String>, parm: impl Into<String>) -> Self {
        self.entries.insert(node_type.into(), parm.into());
        self
    }

    /// The cache path parameter for a node type, if supported
    pub fn param_for(&self, node_type: &str) -> Option<&str> {
        self.entries.get(node_type).map(|s| s.as_str())
    }

    pub fn supports(&self, node_type: &str) -> bool {
        self.entries.contains_key(node_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// List every cache-writing node in the graph
///
/// Walks the full graph and keeps nodes whose type has a parameter map
/// entry, in the host's traversal order. Host failures abort; there is no
/// partial catalog without a live host.
pub fn list_cache_nodes(graph: &dyn HostGraph, params: &ParamMap) -> Result<Vec<CacheNode>> {
    let mut nodes = Vec::new();

    for id in graph.nodes()? {
        let node_type = graph.type_name(&id)?;
        if !params.supports(&node_type) {
            continue;
        }
        let name = graph.node_name(&id)?;
        nodes.push(CacheNode::new(id, name, node_type));
    }

    debug!("cataloged {} cache node(s)", nodes.len());
    Ok(nodes)
}
