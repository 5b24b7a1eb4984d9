//! Test utilities for module registry tests
//!
//! `FakeOpener` stands in for the OS loader: it serves `FakeLibrary` symbol
//! tables keyed by path and records every open attempt. Entry points are
//! plain `extern "C"` functions compiled into the test binary.

#![allow(dead_code)]

use std::collections::HashMap;
use std::ffi::c_void;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actor_modules::module::{LibraryOpener, ModuleLibrary, ModuleRegistry, PathTemplate};

/// In-memory library: symbol name -> function address
#[derive(Clone, Default)]
pub struct FakeLibrary {
    symbols: HashMap<String, usize>,
}

impl FakeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Export `address` (an `extern "C" fn` cast to `usize`) as `symbol`
    pub fn export(mut self, symbol: &str, address: usize) -> Self {
        self.symbols.insert(symbol.to_string(), address);
        self
    }
}

impl ModuleLibrary for FakeLibrary {
    fn lookup(&self, symbol: &str) -> Option<*mut c_void> {
        self.symbols.get(symbol).map(|address| *address as *mut c_void)
    }
}

/// Serves `FakeLibrary`s by path
#[derive(Default)]
pub struct FakeOpener {
    libraries: Mutex<HashMap<PathBuf, FakeLibrary>>,
    attempts: Mutex<Vec<PathBuf>>,
    open_delay: Option<Duration>,
}

impl FakeOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep inside every open, widening race windows
    pub fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = Some(delay);
        self
    }

    /// Make `library` openable at `path` (may be called after registry creation)
    pub fn install<P: AsRef<Path>>(&self, path: P, library: FakeLibrary) {
        self.libraries
            .lock()
            .unwrap()
            .insert(path.as_ref().to_path_buf(), library);
    }

    /// Every path open was attempted on, in order
    pub fn attempts(&self) -> Vec<PathBuf> {
        self.attempts.lock().unwrap().clone()
    }

    /// Number of open attempts on `path`
    pub fn attempts_on<P: AsRef<Path>>(&self, path: P) -> usize {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.as_path() == path.as_ref())
            .count()
    }
}

impl LibraryOpener for FakeOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn ModuleLibrary>, String> {
        self.attempts.lock().unwrap().push(path.to_path_buf());
        if let Some(delay) = self.open_delay {
            std::thread::sleep(delay);
        }
        match self.libraries.lock().unwrap().get(path) {
            Some(library) => Ok(Box::new(library.clone())),
            None => Err(format!(
                "{}: cannot open shared object file: No such file or directory",
                path.display()
            )),
        }
    }
}

/// Registry over `opener` with the given search path
pub fn registry_with(template: &str, opener: &Arc<FakeOpener>) -> ModuleRegistry {
    let opener: Arc<dyn LibraryOpener> = Arc::clone(opener) as Arc<dyn LibraryOpener>;
    ModuleRegistry::with_opener(PathTemplate::parse(template).unwrap(), opener)
}
