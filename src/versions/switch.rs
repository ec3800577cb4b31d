//! Version switcher
//!
//! Rewrites a node's cache path parameter to point at a different version.
//! The write goes through without checking that the target exists on disk;
//! an artist may switch first and regenerate the cache later.

use tracing::{debug, info};

use crate::catalog::ParamMap;
use crate::core::model::{CacheNode, SwitchOutcome, VersionToken};
use crate::core::paths;
use crate::error::{Error, Result};
use crate::host::graph::HostGraph;

/// Point a node's cache path at the target version
///
/// The version segment is replaced by its position in the path, so
/// version-like substrings inside other segments are never rewritten. A
/// path without any version segment is written back unchanged;
/// `SwitchOutcome::changed` tells the two cases apart.
pub fn set_version(
    graph: &dyn HostGraph,
    node: &CacheNode,
    params: &ParamMap,
    target: &VersionToken,
) -> Result<SwitchOutcome> {
    let parm = params
        .param_for(&node.node_type)
        .ok_or_else(|| Error::UnsupportedNodeType(node.node_type.clone()))?;

    let old_value = paths::normalize_path(&graph.eval_parm(&node.id, parm)?);
    let new_value = match paths::replace_version_segment(&old_value, target.name()) {
        Some(value) => value,
        None => {
            debug!(
                "no version segment in cache path of {}, writing back unchanged",
                node.id
            );
            old_value.clone()
        }
    };

    graph.set_parm(&node.id, parm, &new_value)?;

    if new_value != old_value {
        info!("switched {} to {}", node.id, target);
    }

    Ok(SwitchOutcome::new(old_value, new_value))
}
