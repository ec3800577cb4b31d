//! cachesweep - versioned disk-cache housekeeping for a host 3D application
//!
//! The host owns a node graph in which some node types write versioned
//! cache files to disk (`.../v003/splash.0001.bgeo.sc`). This crate
//! catalogs those nodes, resolves the version directories next to each
//! one's cache path, switches a node between versions, and prunes the
//! versions older than the current one. Everything runs synchronously on
//! the caller's thread and reaches the host only through the
//! [`HostGraph`] capability, so the whole crate works the same against
//! the real application or the bundled in-memory graph.

pub mod catalog;
pub mod core;
pub mod error;
pub mod host;
pub mod panel;
pub mod prune;
pub mod versions;

pub use catalog::{list_cache_nodes, ParamMap};
pub use crate::core::model::{CacheNode, NodeId, SwitchOutcome, VersionSet, VersionToken};
pub use error::{Error, Result};
pub use host::graph::{HostError, HostGraph};
pub use host::mem::MemGraph;
pub use panel::{CachePanel, PanelRow, RowStatus};
pub use prune::{prune_unused_caches, NodePruneRecord, PruneFailure, PruneOptions, PruneReport};
pub use versions::resolve::{current_version, resolve_versions};
pub use versions::switch::set_version;
