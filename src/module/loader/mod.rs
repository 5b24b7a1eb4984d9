//! Module loading system
//!
//! Opens module libraries from candidate paths and binds their entry points.

pub mod loader;
pub mod symbols;

pub use loader::{ModuleLoader, SystemLoader};
pub use symbols::{EntryPoints, SymbolBinder};
