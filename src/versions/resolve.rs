//! Path/version resolver
//!
//! Derives the versions root next to a node's cache path and lists the
//! version directories under it. Resolution is tolerant: a node without a
//! usable path simply has no discoverable versions, and only the host
//! going away can abort a caller's batch.

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::catalog::ParamMap;
use crate::core::model::{CacheNode, VersionSet, VersionToken};
use crate::core::paths;
use crate::error::{Error, Result};
use crate::host::graph::HostGraph;

/// The live cache path of a node, normalized to '/' separators
///
/// Errors with `UnsupportedNodeType` when the parameter map has no entry
/// for the node's type.
pub fn cache_path(graph: &dyn HostGraph, node: &CacheNode, params: &ParamMap) -> Result<String> {
    let parm = params
        .param_for(&node.node_type)
        .ok_or_else(|| Error::UnsupportedNodeType(node.node_type.clone()))?;
    let value = graph.eval_parm(&node.id, parm)?;
    Ok(paths::normalize_path(&value))
}

/// List the versions available to a node, ascending
///
/// Unsupported types, empty or unversioned paths and a missing versions
/// root all yield an empty set rather than an error. A listing failure on
/// an existing root is reported as an `Io` error for this node alone.
///
/// The returned set is sorted by the token ordering. The host's directory
/// listing order is platform-dependent, so the sort is what makes repeated
/// resolutions comparable.
pub fn resolve_versions(
    graph: &dyn HostGraph,
    node: &CacheNode,
    params: &ParamMap,
) -> Result<VersionSet> {
    let path = match cache_path(graph, node, params) {
        Ok(path) => path,
        Err(Error::UnsupportedNodeType(node_type)) => {
            debug!("node {} has unsupported type '{}'", node.id, node_type);
            return Ok(VersionSet::new());
        }
        Err(err) => return Err(err),
    };

    if path.is_empty() {
        debug!("node {} has an empty cache path", node.id);
        return Ok(VersionSet::new());
    }

    let root = match paths::versions_root(&path) {
        Some(root) => root,
        None => {
            debug!("no version segment in '{}' for node {}", path, node.id);
            return Ok(VersionSet::new());
        }
    };

    let root = Path::new(&root);
    if !root.is_dir() {
        debug!(
            "versions root {} missing for node {}",
            root.display(),
            node.id
        );
        return Ok(VersionSet::new());
    }

    let mut versions = list_version_dirs(root)?;
    versions.sort();
    Ok(versions)
}

/// List the version directories directly under a versions root
///
/// A child qualifies iff it is a directory and its name starts with 'v'.
/// The root must already exist; callers decide what a missing root means.
pub fn list_version_dirs(root: &Path) -> Result<VersionSet> {
    let entries = fs::read_dir(root).map_err(|e| Error::io(root, e))?;

    let mut versions = VersionSet::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };

        let name = entry.file_name();
        let name = match name.to_str() {
            Some(n) => n,
            None => continue,
        };

        if paths::is_version_dir_name(name) && entry.path().is_dir() {
            versions.push(VersionToken::new(name));
        }
    }

    Ok(versions)
}

/// The version the node currently points at
///
/// Malformed paths error out with `MalformedPath`; callers treat that as
/// "no current version" and skip the node rather than aborting a batch.
pub fn current_version(
    graph: &dyn HostGraph,
    node: &CacheNode,
    params: &ParamMap,
) -> Result<VersionToken> {
    let path = cache_path(graph, node, params)?;
    current_version_of(&path)
}

/// The version segment of a cache path string
pub fn current_version_of(path: &str) -> Result<VersionToken> {
    let normalized = paths::normalize_path(path);
    if normalized.is_empty() {
        return Err(Error::malformed(path, "empty cache path"));
    }

    let segments = paths::split_segments(&normalized);
    if segments.len() < 2 {
        return Err(Error::malformed(path, "fewer than two path segments"));
    }

    match paths::version_segment_index(&segments) {
        Some(idx) => Ok(VersionToken::new(segments[idx])),
        None => Err(Error::malformed(path, "no version segment")),
    }
}
