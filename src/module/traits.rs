//! Module system traits and interfaces
//!
//! Defines the C ABI a service module exports, the opaque handles passed
//! across it, and the errors produced while locating, binding and running
//! modules.

use std::ffi::{c_char, c_int, c_void};
use std::path::Path;
use std::ptr;
use thiserror::Error;

/// `<prefix>_create`: allocate per-instance state, or null on failure
pub type CreateFn = unsafe extern "C" fn() -> *mut c_void;

/// `<prefix>_init`: bind an instance to its actor context
///
/// The returned status is defined by the module; zero conventionally means
/// success.
pub type InitFn =
    unsafe extern "C" fn(instance: *mut c_void, context: *mut c_void, parameters: *const c_char) -> c_int;

/// `<prefix>_release`: free per-instance state
pub type ReleaseFn = unsafe extern "C" fn(instance: *mut c_void);

/// `<prefix>_signal`: deliver an out-of-band control signal
pub type SignalFn = unsafe extern "C" fn(instance: *mut c_void, signal: c_int);

/// Opaque per-actor context owned by the scheduler
///
/// The registry never dereferences it; it is handed to the module's `init`
/// entry point unchanged.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceContext(*mut c_void);

impl ServiceContext {
    /// Wrap a scheduler-owned context pointer
    pub fn from_raw(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    /// A context for modules that do not talk back to the scheduler
    pub fn null() -> Self {
        Self(ptr::null_mut())
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.0
    }
}

/// An opened dynamic library
///
/// Implemented by the OS loader wrapper and by in-process fakes. Dropping the
/// value unloads the library, so it must outlive every entry point looked up
/// from it.
pub trait ModuleLibrary: Send + Sync + 'static {
    /// Resolve an exported symbol to its address
    fn lookup(&self, symbol: &str) -> Option<*mut c_void>;
}

/// Opens dynamic libraries by path
pub trait LibraryOpener: Send + Sync {
    /// Open `path`, returning the platform loader's diagnostic on failure
    fn open(&self, path: &Path) -> Result<Box<dyn ModuleLibrary>, String>;
}

/// Module system errors
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("Invalid module search path segment {segment:?}: {reason}")]
    InvalidSearchPath { segment: String, reason: String },

    #[error("try open {name} failed: {reason}")]
    LoadFailed { name: String, reason: String },

    #[error("Module {name} does not export {symbol}")]
    MissingInitSymbol { name: String, symbol: String },

    #[error("Module registry is full ({capacity} modules), cannot load {name}")]
    CapacityExceeded { name: String, capacity: usize },

    #[error("Module {0} failed to create an instance")]
    CreateFailed(String),

    #[error("Invalid parameters for module {name}: {reason}")]
    InvalidParameters { name: String, reason: String },

    #[error("Module registry already configured")]
    AlreadyConfigured,

    #[error("Module registry not configured")]
    NotConfigured,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ModuleError {
    /// Whether the scheduler should see this failure as "module not found"
    ///
    /// Load, bind and capacity failures all collapse into the same outcome;
    /// none of them is cached, so a later call may succeed.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ModuleError::LoadFailed { .. }
                | ModuleError::MissingInitSymbol { .. }
                | ModuleError::CapacityExceeded { .. }
        )
    }
}

impl From<toml::de::Error> for ModuleError {
    fn from(e: toml::de::Error) -> Self {
        ModuleError::Config(e.to_string())
    }
}

impl From<std::io::Error> for ModuleError {
    fn from(e: std::io::Error) -> Self {
        ModuleError::Config(e.to_string())
    }
}
