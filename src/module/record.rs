//! Loaded module records

use std::fmt;

use crate::module::loader::EntryPoints;
use crate::module::traits::ModuleLibrary;

/// A successfully loaded and bound service module
///
/// Records are immutable once published and shared as `Arc<ModuleRecord>`.
/// The library stays open for as long as the record lives.
pub struct ModuleRecord {
    name: Box<str>,
    pub(crate) entry: EntryPoints,
    // Declared last so it is dropped after the entry points that point into it
    _library: Box<dyn ModuleLibrary>,
}

impl ModuleRecord {
    pub(crate) fn new(name: &str, entry: EntryPoints, library: Box<dyn ModuleLibrary>) -> Self {
        Self {
            name: name.into(),
            entry,
            _library: library,
        }
    }

    /// Module name as registered
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Which optional entry points the module exports
    pub fn exports(&self) -> ModuleExports {
        ModuleExports {
            create: self.entry.create.is_some(),
            release: self.entry.release.is_some(),
            signal: self.entry.signal.is_some(),
        }
    }
}

impl fmt::Debug for ModuleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRecord")
            .field("name", &self.name)
            .field("exports", &self.exports())
            .finish()
    }
}

/// Summary of a module's optional entry points (`init` is always present)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModuleExports {
    pub create: bool,
    pub release: bool,
    pub signal: bool,
}

impl fmt::Display for ModuleExports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = vec!["init"];
        if self.create {
            names.push("create");
        }
        if self.release {
            names.push("release");
        }
        if self.signal {
            names.push("signal");
        }
        f.write_str(&names.join(","))
    }
}
