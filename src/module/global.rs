//! Process-wide registry
//!
//! Runtimes that want a single registry shared by every scheduler thread
//! configure it here once at startup, before any worker starts. Everything
//! else should pass a [`ModuleRegistry`] explicitly.

use std::sync::{Arc, OnceLock};
use tracing::info;

use crate::module::record::ModuleRecord;
use crate::module::registry::ModuleRegistry;
use crate::module::traits::ModuleError;

static REGISTRY: OnceLock<ModuleRegistry> = OnceLock::new();

/// Install `registry` as the process-wide instance
pub fn install(registry: ModuleRegistry) -> Result<&'static ModuleRegistry, ModuleError> {
    let mut installed = false;
    let current = REGISTRY.get_or_init(|| {
        installed = true;
        registry
    });

    if installed {
        info!("Module registry configured with search path {}", current.search_path());
        Ok(current)
    } else {
        Err(ModuleError::AlreadyConfigured)
    }
}

/// Build and install the process-wide registry from a search path template
pub fn configure(search_path: &str) -> Result<&'static ModuleRegistry, ModuleError> {
    if REGISTRY.get().is_some() {
        return Err(ModuleError::AlreadyConfigured);
    }
    install(ModuleRegistry::new(search_path)?)
}

/// The process-wide registry, if configured
pub fn registry() -> Option<&'static ModuleRegistry> {
    REGISTRY.get()
}

/// Load through the process-wide registry
pub fn get_or_load(name: &str) -> Result<Arc<ModuleRecord>, ModuleError> {
    registry().ok_or(ModuleError::NotConfigured)?.get_or_load(name)
}
