//! Crate-wide error taxonomy
//!
//! Only a host failure is fatal to a batch operation. Everything else
//! names a condition on a single node or path; callers record it, skip,
//! and keep going.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::model::NodeId;
use crate::host::graph::HostError;

/// Errors surfaced by the catalog, resolver, switcher and pruner
#[derive(Debug, Error)]
pub enum Error {
    /// The host graph itself failed; nothing sensible can continue
    #[error("host unavailable: {0}")]
    HostUnavailable(#[from] HostError),

    /// Node type has no entry in the parameter map
    #[error("unsupported node type '{0}'")]
    UnsupportedNodeType(String),

    /// Cache path does not carry a recognizable version segment
    #[error("malformed cache path '{path}': {reason}")]
    MalformedPath { path: String, reason: String },

    /// Filesystem failure on one path
    #[error("io failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An operation referenced a node that is not in the catalog
    #[error("unknown node '{0}'")]
    UnknownNode(NodeId),
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether batch loops must stop on this error
    pub fn aborts_batch(&self) -> bool {
        matches!(self, Error::HostUnavailable(_))
    }

    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
