//! Module loader implementation
//!
//! Opens a module's backing library from its candidate paths.

use std::ffi::c_void;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::module::traits::{LibraryOpener, ModuleError, ModuleLibrary};

/// Module loader for opening module libraries
pub struct ModuleLoader;

impl ModuleLoader {
    /// Open the first candidate that the platform loader accepts
    ///
    /// Candidates are tried strictly in order. Each attempt is independent;
    /// a failed open leaves nothing behind. When every candidate fails, the
    /// error carries the module name and the last loader diagnostic.
    pub fn try_open<I>(
        opener: &dyn LibraryOpener,
        name: &str,
        candidates: I,
    ) -> Result<Box<dyn ModuleLibrary>, ModuleError>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut last_error = None;

        for path in candidates {
            match opener.open(&path) {
                Ok(library) => {
                    info!("Opened module {} from {:?}", name, path);
                    return Ok(library);
                }
                Err(e) => {
                    debug!("Module {} not loadable from {:?}: {}", name, path, e);
                    last_error = Some(e);
                }
            }
        }

        Err(ModuleError::LoadFailed {
            name: name.to_string(),
            reason: last_error.unwrap_or_else(|| "no candidate paths".to_string()),
        })
    }
}

/// Opens libraries through the operating system loader
///
/// On Unix libraries are opened with `RTLD_NOW | RTLD_GLOBAL`: undefined
/// symbols are resolved at open time, and the module's own exports become
/// visible to modules opened after it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLoader;

impl LibraryOpener for SystemLoader {
    fn open(&self, path: &Path) -> Result<Box<dyn ModuleLibrary>, String> {
        let library = open_library(path).map_err(|e| e.to_string())?;
        Ok(Box::new(SystemLibrary(library)))
    }
}

#[cfg(unix)]
fn open_library(path: &Path) -> Result<libloading::Library, libloading::Error> {
    use libloading::os::unix::{Library, RTLD_GLOBAL, RTLD_NOW};

    // SAFETY: opening a library runs its initializers. Service modules are
    // trusted code placed on the search path by the operator.
    unsafe { Library::open(Some(path), RTLD_NOW | RTLD_GLOBAL) }.map(Into::into)
}

#[cfg(not(unix))]
fn open_library(path: &Path) -> Result<libloading::Library, libloading::Error> {
    // SAFETY: see the Unix variant; service modules are trusted code.
    unsafe { libloading::Library::new(path) }
}

/// A library opened by [`SystemLoader`]
struct SystemLibrary(libloading::Library);

impl ModuleLibrary for SystemLibrary {
    fn lookup(&self, symbol: &str) -> Option<*mut c_void> {
        // SAFETY: only the symbol's address is read here. It is given a
        // function type by the binder, which owns the ABI contract.
        let address = unsafe { self.0.get::<*mut c_void>(symbol.as_bytes()) }
            .map(|sym| *sym)
            .ok()?;
        (!address.is_null()).then_some(address)
    }
}
