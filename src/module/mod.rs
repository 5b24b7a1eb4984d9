//! Service module system
//!
//! A service module is a dynamic library implementing one actor type. It is
//! found by name through a search path template, opened once, and bound to
//! four convention-named entry points (`<prefix>_create`, `_init`,
//! `_release`, `_signal`).
//!
//! ## Architecture
//!
//! - **Templates**: `registry::template` expands a module name into candidate paths
//! - **Loading**: `loader` opens the first loadable candidate and binds its symbols
//! - **Registry**: `registry` loads each name at most once and shares the record
//! - **Lifecycle**: `lifecycle` drives instances through create/init/signal/release

pub mod global;
pub mod lifecycle;
pub mod loader;
pub mod record;
pub mod registry;
pub mod traits;

pub use lifecycle::ServiceInstance;
pub use loader::{EntryPoints, ModuleLoader, SymbolBinder, SystemLoader};
pub use record::{ModuleExports, ModuleRecord};
pub use registry::{CandidatePaths, ModuleRegistry, PathTemplate};
pub use traits::{LibraryOpener, ModuleError, ModuleLibrary, ServiceContext};
