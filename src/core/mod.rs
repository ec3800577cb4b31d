//! Core module - Contains the shared data model and path utilities
//!
//! This module provides:
//! - Unified cache model (nodes, version tokens, switch outcomes)
//! - Cache path parsing (version segments, versions roots)

pub mod model;
pub mod paths;
