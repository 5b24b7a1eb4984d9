//! Module registry
//!
//! Maps module names to loaded [`ModuleRecord`]s. The table only grows:
//! records are published once and never removed, replaced or moved, so an
//! `Arc<ModuleRecord>` handed out stays valid and identical for every later
//! lookup of the same name.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::RegistryConfig;
use crate::module::loader::{ModuleLoader, SymbolBinder, SystemLoader};
use crate::module::record::ModuleRecord;
use crate::module::registry::template::PathTemplate;
use crate::module::traits::{LibraryOpener, ModuleError};

/// Concurrent, append-only registry of service modules
pub struct ModuleRegistry {
    /// Where module libraries are searched for
    template: PathTemplate,
    /// OS loader (or a test double)
    opener: Arc<dyn LibraryOpener>,
    /// Optional ceiling on the number of distinct modules
    capacity: Option<usize>,
    /// Published records
    modules: DashMap<Box<str>, Arc<ModuleRecord>>,
    /// Number of published records
    published: AtomicUsize,
    /// Held for the whole miss path of `get_or_load`, so one name is never
    /// loaded twice
    load_lock: Mutex<()>,
}

impl ModuleRegistry {
    /// Create a registry that loads through the OS loader
    ///
    /// Fails if `search_path` is not a valid template; this is checked
    /// before any file is touched.
    pub fn new(search_path: &str) -> Result<Self, ModuleError> {
        let template = PathTemplate::parse(search_path)?;
        Ok(Self::with_opener(template, Arc::new(SystemLoader)))
    }

    /// Create a registry with a custom library opener
    pub fn with_opener(template: PathTemplate, opener: Arc<dyn LibraryOpener>) -> Self {
        Self {
            template,
            opener,
            capacity: None,
            modules: DashMap::new(),
            published: AtomicUsize::new(0),
            load_lock: Mutex::new(()),
        }
    }

    /// Limit the number of distinct modules the registry will hold
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Create a registry from configuration
    pub fn from_config(config: &RegistryConfig) -> Result<Self, ModuleError> {
        config.validate()?;
        let registry = Self::new(&config.search_path)?;
        Ok(match config.max_modules {
            Some(capacity) => registry.with_capacity(capacity),
            None => registry,
        })
    }

    /// Look up an already loaded module without loading anything
    pub fn get(&self, name: &str) -> Option<Arc<ModuleRecord>> {
        self.modules.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Return the module named `name`, loading it on first use
    ///
    /// Concurrent first calls for the same name load it once and all receive
    /// the same record. Failures are not remembered: the next call retries
    /// the full search, open and bind sequence.
    pub fn get_or_load(&self, name: &str) -> Result<Arc<ModuleRecord>, ModuleError> {
        if let Some(record) = self.get(name) {
            return Ok(record);
        }

        let _guard = self.load_lock.lock();

        // A concurrent caller may have finished loading while we waited
        if let Some(record) = self.get(name) {
            return Ok(record);
        }

        if let Some(capacity) = self.capacity {
            if self.published.load(Ordering::Acquire) >= capacity {
                return Err(ModuleError::CapacityExceeded {
                    name: name.to_string(),
                    capacity,
                });
            }
        }

        debug!("Loading module {} from {}", name, self.template);
        let library = ModuleLoader::try_open(self.opener.as_ref(), name, self.template.resolve(name))?;
        let entry = SymbolBinder::bind(library.as_ref(), name)?;

        let record = Arc::new(ModuleRecord::new(name, entry, library));
        self.modules.insert(name.into(), Arc::clone(&record));
        self.published.fetch_add(1, Ordering::Release);

        info!("Registered module {} ({})", name, record.exports());
        Ok(record)
    }

    /// Like [`get_or_load`](Self::get_or_load), collapsing every failure
    /// into `None` after logging it
    pub fn query(&self, name: &str) -> Option<Arc<ModuleRecord>> {
        match self.get_or_load(name) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Module {} unavailable: {}", name, e);
                None
            }
        }
    }

    /// Load each module eagerly, returning the ones that failed
    pub fn preload<S: AsRef<str>>(&self, names: &[S]) -> Vec<(String, ModuleError)> {
        let mut failures = Vec::new();
        for name in names {
            let name = name.as_ref();
            if let Err(e) = self.get_or_load(name) {
                warn!("Failed to preload module {}: {}", name, e);
                failures.push((name.to_string(), e));
            }
        }
        failures
    }

    /// Number of registered modules
    pub fn len(&self) -> usize {
        self.published.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured module ceiling, if any
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn search_path(&self) -> &PathTemplate {
        &self.template
    }

    /// Names of all registered modules, sorted
    pub fn module_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modules.iter().map(|entry| entry.key().to_string()).collect();
        names.sort();
        names
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("search_path", &self.template.as_str())
            .field("capacity", &self.capacity)
            .field("modules", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::traits::ModuleLibrary;
    use std::ffi::{c_char, c_int, c_void};
    use std::path::Path;

    unsafe extern "C" fn unit_init(_: *mut c_void, _: *mut c_void, _: *const c_char) -> c_int {
        0
    }

    /// Library exporting `<name>_init` for every name
    struct InitOnly;

    impl ModuleLibrary for InitOnly {
        fn lookup(&self, symbol: &str) -> Option<*mut c_void> {
            symbol.ends_with("_init").then_some(unit_init as *mut c_void)
        }
    }

    /// Opens every path whose file stem is not "missing"
    #[derive(Default)]
    struct CountingOpener {
        opens: AtomicUsize,
    }

    impl LibraryOpener for CountingOpener {
        fn open(&self, path: &Path) -> Result<Box<dyn ModuleLibrary>, String> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            if path.file_stem().and_then(|s| s.to_str()) == Some("missing") {
                Err("not found".to_string())
            } else {
                Ok(Box::new(InitOnly))
            }
        }
    }

    fn registry(opener: Arc<CountingOpener>) -> ModuleRegistry {
        ModuleRegistry::with_opener(PathTemplate::parse("./svc/?.so").unwrap(), opener)
    }

    #[test]
    fn test_new_rejects_bad_template() {
        assert!(matches!(
            ModuleRegistry::new("./svc/"),
            Err(ModuleError::InvalidSearchPath { .. })
        ));
    }

    #[test]
    fn test_hit_does_not_reopen() {
        let opener = Arc::new(CountingOpener::default());
        let registry = registry(Arc::clone(&opener));

        let first = registry.get_or_load("echo").unwrap();
        let second = registry.get_or_load("echo").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(opener.opens.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_does_not_load() {
        let opener = Arc::new(CountingOpener::default());
        let registry = registry(Arc::clone(&opener));
        assert!(registry.get("echo").is_none());
        assert_eq!(opener.opens.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_query_collapses_failure() {
        let opener = Arc::new(CountingOpener::default());
        let registry = registry(Arc::clone(&opener));
        assert!(registry.query("missing").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_preload_reports_failures() {
        let opener = Arc::new(CountingOpener::default());
        let registry = registry(opener);
        let failures = registry.preload(&["logger", "missing", "gate"]);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "missing");
        assert_eq!(registry.module_names(), vec!["gate", "logger"]);
    }

    #[test]
    fn test_zero_capacity_never_loads() {
        let opener = Arc::new(CountingOpener::default());
        let registry = registry(Arc::clone(&opener)).with_capacity(0);
        assert!(matches!(
            registry.get_or_load("echo"),
            Err(ModuleError::CapacityExceeded { capacity: 0, .. })
        ));
        assert_eq!(opener.opens.load(Ordering::SeqCst), 0);
    }
}
