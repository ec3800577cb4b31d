//! Cache pruner
//!
//! Deletes version directories numbered strictly below each node's current
//! version. The pass is intentionally best-effort: filesystem failures are
//! collected into the returned report and do not abort the remaining
//! versions or nodes. Only losing the host aborts the run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::catalog::ParamMap;
use crate::core::model::{CacheNode, NodeId, VersionToken};
use crate::core::paths;
use crate::error::Result;
use crate::host::graph::HostGraph;
use crate::versions::resolve::{cache_path, current_version_of, list_version_dirs};

/// Controls how a prune pass runs
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PruneOptions {
    /// If true, don't delete anything; only report what would be removed
    #[serde(default)]
    pub dry_run: bool,
}

/// One failed filesystem action inside a prune pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PruneFailure {
    /// Path the action was attempted on
    pub path: PathBuf,

    /// Short name of the attempted action
    pub action: String,

    /// Stringified failure
    pub error: String,
}

/// What pruning did (or skipped) for one node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodePruneRecord {
    /// The node this record belongs to
    pub node: CacheNode,

    /// Current version at prune time, when one could be read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<VersionToken>,

    /// Versions whose directory is gone after this pass (or that a dry
    /// run would remove)
    pub deleted: Vec<VersionToken>,

    /// Whether the node was skipped without any deletion attempt
    pub skipped: bool,

    /// Reason for skipping (if skipped)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,

    /// Failed filesystem actions; deletion continued past each one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<PruneFailure>,
}

impl NodePruneRecord {
    /// Create a record for a node whose versions were examined
    fn processed(node: CacheNode, current: VersionToken) -> Self {
        Self {
            node,
            current: Some(current),
            deleted: Vec::new(),
            skipped: false,
            skip_reason: None,
            failures: Vec::new(),
        }
    }

    /// Create a record for a node that was skipped outright
    fn skipped(node: CacheNode, reason: impl Into<String>) -> Self {
        Self {
            node,
            current: None,
            deleted: Vec::new(),
            skipped: true,
            skip_reason: Some(reason.into()),
            failures: Vec::new(),
        }
    }

    /// Attach the current version to a skipped record
    fn with_current(mut self, current: VersionToken) -> Self {
        self.current = Some(current);
        self
    }

    fn push_failure(&mut self, path: impl Into<PathBuf>, action: &str, err: impl ToString) {
        self.failures.push(PruneFailure {
            path: path.into(),
            action: action.to_string(),
            error: err.to_string(),
        });
    }

    /// Whether this pass removed at least one version directory
    pub fn has_deletions(&self) -> bool {
        !self.deleted.is_empty()
    }
}

/// Summary of one prune pass over a catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PruneReport {
    /// Wall-clock start of the pass
    pub started_at: DateTime<Utc>,

    /// Wall-clock end of the pass
    pub finished_at: DateTime<Utc>,

    /// Whether this pass was a dry run
    pub dry_run: bool,

    /// One record per cataloged node, in catalog order
    pub records: Vec<NodePruneRecord>,
}

impl PruneReport {
    /// Nodes that ended up with at least one deleted version
    pub fn nodes_with_deletions(&self) -> Vec<&CacheNode> {
        self.records
            .iter()
            .filter(|r| r.has_deletions())
            .map(|r| &r.node)
            .collect()
    }

    /// Total number of version directories removed
    pub fn deleted_count(&self) -> usize {
        self.records.iter().map(|r| r.deleted.len()).sum()
    }

    /// Total number of recorded filesystem failures
    pub fn failure_count(&self) -> usize {
        self.records.iter().map(|r| r.failures.len()).sum()
    }

    /// The record for one node, if it was part of the pruned catalog
    pub fn record_for(&self, id: &NodeId) -> Option<&NodePruneRecord> {
        self.records.iter().find(|r| &r.node.id == id)
    }
}

/// Delete version directories older than each node's current version
///
/// Per node: the current version number gates everything, and a node
/// without one is recorded as skipped. Numbered versions strictly below it
/// are deleted one version directory at a time, files first, directories
/// bottom-up. Unnumbered version directories are never touched, nor is
/// anything numbered at or above current.
///
/// Re-running after a partial failure simply retries whatever is left.
pub fn prune_unused_caches(
    graph: &dyn HostGraph,
    catalog: &[CacheNode],
    params: &ParamMap,
    options: PruneOptions,
) -> Result<PruneReport> {
    let started_at = Utc::now();
    let mut records = Vec::with_capacity(catalog.len());

    for node in catalog {
        records.push(prune_node(graph, node, params, options)?);
    }

    let report = PruneReport {
        started_at,
        finished_at: Utc::now(),
        dry_run: options.dry_run,
        records,
    };

    info!(
        "prune pass{} removed {} version dir(s) across {} node(s), {} failure(s)",
        if report.dry_run { " (dry run)" } else { "" },
        report.deleted_count(),
        report.nodes_with_deletions().len(),
        report.failure_count()
    );
    Ok(report)
}

fn prune_node(
    graph: &dyn HostGraph,
    node: &CacheNode,
    params: &ParamMap,
    options: PruneOptions,
) -> Result<NodePruneRecord> {
    // Only a host failure propagates; everything else becomes a skip record.
    let path = match cache_path(graph, node, params) {
        Ok(path) => path,
        Err(err) if err.aborts_batch() => return Err(err),
        Err(err) => {
            debug!("skipping {}: {}", node.id, err);
            return Ok(NodePruneRecord::skipped(node.clone(), err.to_string()));
        }
    };

    let current = match current_version_of(&path) {
        Ok(token) => token,
        Err(err) => {
            debug!("skipping {}: {}", node.id, err);
            return Ok(NodePruneRecord::skipped(node.clone(), err.to_string()));
        }
    };

    let current_num = match current.number() {
        Some(num) => num,
        None => {
            debug!(
                "skipping {}: current version '{}' has no number",
                node.id, current
            );
            let reason = format!("current version '{}' has no number", current);
            return Ok(NodePruneRecord::skipped(node.clone(), reason).with_current(current));
        }
    };

    let mut record = NodePruneRecord::processed(node.clone(), current);

    let root = match paths::versions_root(&path) {
        Some(root) => PathBuf::from(root),
        None => {
            return Ok(record);
        }
    };
    if !root.is_dir() {
        debug!("versions root {} missing for {}", root.display(), node.id);
        return Ok(record);
    }

    let mut versions = match list_version_dirs(&root) {
        Ok(set) => set,
        Err(err) => {
            warn!("cannot list versions root for {}: {}", node.id, err);
            record.push_failure(&root, "read_dir", err);
            return Ok(record);
        }
    };
    versions.sort();

    for token in &versions {
        let eligible = token.number().map(|n| n < current_num).unwrap_or(false);
        if !eligible {
            continue;
        }

        let dir = root.join(token.name());
        if options.dry_run {
            debug!("dry run, would remove {}", dir.display());
            record.deleted.push(token.clone());
            continue;
        }

        delete_version_dir(&dir, &mut record);
        if !dir.exists() {
            info!("removed {} for {}", dir.display(), node.id);
            record.deleted.push(token.clone());
        }
    }

    Ok(record)
}

/// Delete one version directory, files first, then directories bottom-up
///
/// Failures are recorded and the walk keeps going, so one locked file does
/// not shield the rest of the directory from cleanup.
fn delete_version_dir(dir: &Path, record: &mut NodePruneRecord) {
    for entry in WalkDir::new(dir).contents_first(true).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| dir.to_path_buf());
                record.push_failure(path, "walkdir", err);
                continue;
            }
        };

        let path = entry.path();
        let outcome = if entry.file_type().is_dir() {
            fs::remove_dir(path)
        } else {
            fs::remove_file(path)
        };

        if let Err(err) = outcome {
            warn!("cannot remove {}: {}", path.display(), err);
            let action = if entry.file_type().is_dir() {
                "remove_dir"
            } else {
                "remove_file"
            };
            record.push_failure(path, action, err);
        }
    }
}
