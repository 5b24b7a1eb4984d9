//! Module registry and search paths
//!
//! Handles search path templates and the name-to-module table.

pub mod registry;
pub mod template;

pub use registry::ModuleRegistry;
pub use template::{CandidatePaths, PathTemplate};
