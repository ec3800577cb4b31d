//! Host module - The boundary to the host application's node graph
//!
//! Provides:
//! - graph: The `HostGraph` capability trait and host-side errors
//! - mem: In-memory implementation for tests and headless runs

pub mod graph;
pub mod mem;
