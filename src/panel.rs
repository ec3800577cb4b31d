//! Panel controller
//!
//! Headless state for a cache-manager panel: one row per cataloged node
//! with its resolved versions, current version and a row status. The GUI
//! renders these rows and calls back in through the methods here; rows are
//! keyed by node identity, never by display position.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{list_cache_nodes, ParamMap};
use crate::core::model::{CacheNode, NodeId, SwitchOutcome, VersionSet, VersionToken};
use crate::error::{Error, Result};
use crate::host::graph::HostGraph;
use crate::prune::{prune_unused_caches, PruneOptions, PruneReport};
use crate::versions::resolve::{current_version, resolve_versions};
use crate::versions::switch::set_version;

/// Display state of one panel row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    /// Current version is present in the version listing
    Ready,

    /// Current version parsed fine but its directory is not on disk
    CurrentMissing,

    /// The cache path has no usable version segment
    MalformedPath(String),

    /// Version listing failed for this node
    ResolveFailed(String),
}

/// One row of the panel: a node and everything the UI shows about it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelRow {
    /// Node snapshot from the catalog
    pub node: CacheNode,

    /// Versions discovered next to the node's cache path, ascending
    pub versions: VersionSet,

    /// Version the node currently points at, when the path yields one
    pub current: Option<VersionToken>,

    /// Row health, for the UI to badge
    pub status: RowStatus,
}

impl PanelRow {
    /// Versions other than the current one, for the "switch to" list
    pub fn unused(&self) -> Vec<VersionToken> {
        self.versions.unused(self.current.as_ref())
    }
}

/// The cache panel: rows plus the actions the UI wires up
///
/// Per-row failures during population land in the row status; only a host
/// failure propagates out of any method here.
pub struct CachePanel<'g> {
    graph: &'g dyn HostGraph,
    params: ParamMap,
    rows: Vec<PanelRow>,
}

impl<'g> CachePanel<'g> {
    /// Build a panel over the graph with the built-in parameter map
    pub fn new(graph: &'g dyn HostGraph) -> Result<Self> {
        Self::with_params(graph, ParamMap::builtin())
    }

    /// Build a panel with a caller-supplied parameter map
    pub fn with_params(graph: &'g dyn HostGraph, params: ParamMap) -> Result<Self> {
        let mut panel = Self {
            graph,
            params,
            rows: Vec::new(),
        };
        panel.refresh()?;
        Ok(panel)
    }

    pub fn rows(&self) -> &[PanelRow] {
        &self.rows
    }

    pub fn row(&self, id: &NodeId) -> Option<&PanelRow> {
        self.rows.iter().find(|r| &r.node.id == id)
    }

    pub fn params(&self) -> &ParamMap {
        &self.params
    }

    /// Rebuild every row from the live graph
    pub fn refresh(&mut self) -> Result<()> {
        let catalog = list_cache_nodes(self.graph, &self.params)?;
        let mut rows = Vec::with_capacity(catalog.len());
        for node in catalog {
            rows.push(build_row(self.graph, node, &self.params)?);
        }
        self.rows = rows;
        Ok(())
    }

    /// Rebuild one row from the live graph
    pub fn refresh_row(&mut self, id: &NodeId) -> Result<()> {
        let idx = self
            .rows
            .iter()
            .position(|r| &r.node.id == id)
            .ok_or_else(|| Error::UnknownNode(id.clone()))?;
        let node = self.rows[idx].node.clone();
        self.rows[idx] = build_row(self.graph, node, &self.params)?;
        Ok(())
    }

    /// Switch a node to the target version, then re-resolve its row
    pub fn select_version(
        &mut self,
        id: &NodeId,
        target: &VersionToken,
    ) -> Result<SwitchOutcome> {
        let row = self.row(id).ok_or_else(|| Error::UnknownNode(id.clone()))?;
        let node = row.node.clone();

        let outcome = set_version(self.graph, &node, &self.params, target)?;
        self.refresh_row(id)?;
        Ok(outcome)
    }

    /// Prune old versions across every row, then re-resolve affected rows
    pub fn prune(&mut self, options: PruneOptions) -> Result<PruneReport> {
        let catalog: Vec<CacheNode> = self.rows.iter().map(|r| r.node.clone()).collect();
        let report = prune_unused_caches(self.graph, &catalog, &self.params, options)?;

        if !report.dry_run {
            let ids: Vec<NodeId> = report
                .nodes_with_deletions()
                .iter()
                .map(|n| n.id.clone())
                .collect();
            for id in ids {
                self.refresh_row(&id)?;
            }
        }
        Ok(report)
    }

    /// Make a row's node the host's selection (exclusive)
    pub fn activate(&self, id: &NodeId) -> Result<()> {
        let row = self.row(id).ok_or_else(|| Error::UnknownNode(id.clone()))?;
        self.graph.set_selected(&row.node.id, true)?;
        debug!("activated {}", row.node.id);
        Ok(())
    }
}

fn build_row(graph: &dyn HostGraph, node: CacheNode, params: &ParamMap) -> Result<PanelRow> {
    let versions = match resolve_versions(graph, &node, params) {
        Ok(set) => set,
        Err(err) if err.aborts_batch() => return Err(err),
        Err(err) => {
            warn!("cannot resolve versions for {}: {}", node.id, err);
            return Ok(PanelRow {
                node,
                versions: VersionSet::new(),
                current: None,
                status: RowStatus::ResolveFailed(err.to_string()),
            });
        }
    };

    match current_version(graph, &node, params) {
        Ok(token) => {
            let status = if versions.contains_name(token.name()) {
                RowStatus::Ready
            } else {
                RowStatus::CurrentMissing
            };
            Ok(PanelRow {
                node,
                versions,
                current: Some(token),
                status,
            })
        }
        Err(err) if err.aborts_batch() => Err(err),
        Err(Error::MalformedPath { reason, .. }) => {
            debug!("no current version for {}: {}", node.id, reason);
            Ok(PanelRow {
                node,
                versions,
                current: None,
                status: RowStatus::MalformedPath(reason),
            })
        }
        Err(err) => Ok(PanelRow {
            node,
            versions,
            current: None,
            status: RowStatus::ResolveFailed(err.to_string()),
        }),
    }
}
