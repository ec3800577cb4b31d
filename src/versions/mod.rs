//! Versions module - Resolve and switch cache versions
//!
//! Provides:
//! - resolve: List the version directories next to a node's cache path
//! - switch: Point a node's cache path at a different version

pub mod resolve;
pub mod switch;
