//! Unified cache model
//!
//! Everything the catalog, resolver, switcher and pruner exchange lives
//! here: node snapshots, version tokens and switch outcomes. All of it
//! serializes cleanly so the host's scripting layer can persist or
//! display it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::paths::version_number;

/// Opaque host-assigned identity of a node (a path-like string in practice)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Snapshot of a cataloged cache-writing node
///
/// The host owns the node; this carries just enough to address it and
/// render a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheNode {
    /// Host identity, used for all follow-up host calls
    pub id: NodeId,

    /// Instance name shown to the user
    pub name: String,

    /// Node type name, the key into the parameter map
    pub node_type: String,
}

impl CacheNode {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type: node_type.into(),
        }
    }
}

/// A version directory name, e.g. `v003`
///
/// The embedded number is present only for strictly version-shaped names
/// (`v` + digits). Names that merely start with 'v' (like `vtmp`) can show
/// up in listings but never take part in numeric comparison or pruning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct VersionToken {
    name: String,
    number: Option<u64>,
}

impl VersionToken {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let number = version_number(&name);
        Self { name, number }
    }

    /// The directory name itself
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The embedded version number, if the name is strictly `v` + digits
    pub fn number(&self) -> Option<u64> {
        self.number
    }

    pub fn is_numbered(&self) -> bool {
        self.number.is_some()
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for VersionToken {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for VersionToken {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<VersionToken> for String {
    fn from(token: VersionToken) -> Self {
        token.name
    }
}

/// Numbered tokens ascend by their number (so v9 < v10), ties broken by
/// name; unnumbered tokens sort after all numbered ones, by name.
impl Ord for VersionToken {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match (self.number, other.number) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.name.cmp(&other.name)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.name.cmp(&other.name),
        }
    }
}

impl PartialOrd for VersionToken {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordered set of version directories found under one versions root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionSet {
    tokens: Vec<VersionToken>,
}

impl VersionSet {
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    pub fn push(&mut self, token: VersionToken) {
        self.tokens.push(token);
    }

    /// Sort ascending by the token ordering for stable output
    pub fn sort(&mut self) {
        self.tokens.sort();
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[VersionToken] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VersionToken> {
        self.tokens.iter()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.tokens.iter().any(|t| t.name() == name)
    }

    /// Every token except the given current one
    pub fn unused(&self, current: Option<&VersionToken>) -> Vec<VersionToken> {
        self.tokens
            .iter()
            .filter(|t| current.map(|c| c.name() != t.name()).unwrap_or(true))
            .cloned()
            .collect()
    }
}

impl IntoIterator for VersionSet {
    type Item = VersionToken;
    type IntoIter = std::vec::IntoIter<VersionToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'a> IntoIterator for &'a VersionSet {
    type Item = &'a VersionToken;
    type IntoIter = std::slice::Iter<'a, VersionToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl FromIterator<VersionToken> for VersionSet {
    fn from_iter<T: IntoIterator<Item = VersionToken>>(iter: T) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

/// What a version switch actually did to the node's path parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchOutcome {
    /// Parameter value before the write
    pub old_value: String,

    /// Parameter value written back
    pub new_value: String,
}

impl SwitchOutcome {
    pub fn new(old_value: impl Into<String>, new_value: impl Into<String>) -> Self {
        Self {
            old_value: old_value.into(),
            new_value: new_value.into(),
        }
    }

    /// False when the write was a no-op (path had no version segment)
    pub fn changed(&self) -> bool {
        self.old_value != self.new_value
    }
}
