//! Actor Modules - service module registry for actor runtimes
//!
//! An actor runtime spawns services by type name. This crate turns such a
//! name into a loaded, bound service module and gives the scheduler a
//! uniform create/init/signal/release lifecycle over it.
//!
//! ## Design Principles
//!
//! 1. **Load Once**: each module name is resolved, opened and bound at most once
//! 2. **Stable Records**: published records are never moved, mutated or removed
//! 3. **No Cached Failure**: a module that failed to load is retried on the next request
//! 4. **Cheap Hits**: lookups of loaded modules never wait on a load in progress
//!
//! ```rust,no_run
//! use actor_modules::module::{ModuleRegistry, ServiceContext};
//!
//! let registry = ModuleRegistry::new("./cservice/?.so")?;
//! let logger = registry.get_or_load("logger")?;
//! let instance = logger.create()?;
//! let status = logger.init(&instance, ServiceContext::null(), Some("logfile"))?;
//! assert_eq!(status, 0);
//! logger.release(instance);
//! # Ok::<(), actor_modules::module::ModuleError>(())
//! ```

pub mod config;
pub mod module;
pub mod utils;

pub use config::{LoggingConfig, RegistryConfig};
pub use module::{ModuleError, ModuleRecord, ModuleRegistry, ServiceContext, ServiceInstance};
