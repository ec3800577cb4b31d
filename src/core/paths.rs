//! Cache path parsing utilities
//!
//! Cache paths are POSIX-style strings ('/'-separated) pointing at a file
//! inside a version directory, e.g. `/show/fx/geo/v003/splash.0001.bgeo.sc`.
//! Everything that needs to know where the version sits in a path goes
//! through one shared rule here, so the resolver, the switcher and the
//! pruner can never disagree about it.

use once_cell::sync::Lazy;
use regex::Regex;

/// Static regex for version-shaped directory names
/// Format: `v` followed by one or more digits (v003, v12, v0042)
pub static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^v(\d+)$").expect("Invalid VERSION_RE regex"));

/// Normalize a cache path to '/' separators
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Split a normalized cache path into its segments
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').collect()
}

/// Check whether a single segment is version-shaped (`v` + digits)
pub fn is_version_shaped(segment: &str) -> bool {
    VERSION_RE.is_match(segment)
}

/// Extract the number embedded in a version-shaped segment
///
/// Returns None for segments that are not version-shaped and for numbers
/// too large for u64.
pub fn version_number(segment: &str) -> Option<u64> {
    VERSION_RE
        .captures(segment)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Check whether a directory name belongs in a version listing
///
/// The listing rule is prefix-based: any name starting with 'v' qualifies,
/// version-shaped or not.
pub fn is_version_dir_name(name: &str) -> bool {
    name.starts_with('v')
}

/// Find the index of the version segment in a split cache path
///
/// The second-to-last segment wins when it is version-shaped (the common
/// `<root>/<version>/<file>` layout). Otherwise the deepest version-shaped
/// segment anywhere in the path is used, so paths like
/// `/cache/v003/sim/out.bgeo` still resolve.
pub fn version_segment_index(segments: &[&str]) -> Option<usize> {
    if segments.len() >= 2 {
        let idx = segments.len() - 2;
        if is_version_shaped(segments[idx]) {
            return Some(idx);
        }
    }
    segments.iter().rposition(|s| is_version_shaped(s))
}

/// The version segment of a cache path, if it has one
pub fn version_segment(path: &str) -> Option<String> {
    let normalized = normalize_path(path);
    let segments = split_segments(&normalized);
    version_segment_index(&segments).map(|idx| segments[idx].to_string())
}

/// The directory holding all version directories for a cache path
///
/// This is the prefix strictly before the version segment. For the common
/// `<root>/<version>/<file>` layout it equals "drop the filename, then drop
/// one more segment".
pub fn versions_root(path: &str) -> Option<String> {
    let normalized = normalize_path(path);
    let segments = split_segments(&normalized);
    version_segment_index(&segments).map(|idx| segments[..idx].join("/"))
}

/// Replace the version segment of a cache path with a new name
///
/// Replacement is by segment index, so repeated version-like substrings in
/// other segments are left alone. Returns None when the path has no version
/// segment.
pub fn replace_version_segment(path: &str, new_version: &str) -> Option<String> {
    let normalized = normalize_path(path);
    let mut segments = split_segments(&normalized);
    let idx = version_segment_index(&segments)?;
    segments[idx] = new_version;
    Some(segments.join("/"))
}
