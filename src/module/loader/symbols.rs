//! Entry point binding
//!
//! A module named `game.room` exports `room_create`, `room_init`,
//! `room_release` and `room_signal`: the symbol prefix is the part of the
//! module name after its last `.`.

use std::ffi::c_void;
use std::mem;
use tracing::debug;

use crate::module::traits::{CreateFn, InitFn, ModuleError, ModuleLibrary, ReleaseFn, SignalFn};

/// Separator between a module's namespace and its symbol prefix
pub const NAME_SEPARATOR: char = '.';

/// Entry points bound from one library
#[derive(Debug, Clone, Copy)]
pub struct EntryPoints {
    pub create: Option<CreateFn>,
    pub init: InitFn,
    pub release: Option<ReleaseFn>,
    pub signal: Option<SignalFn>,
}

/// Resolves a module's entry points from its library
pub struct SymbolBinder;

impl SymbolBinder {
    /// Symbol prefix for a module name
    pub fn symbol_prefix(module_name: &str) -> &str {
        match module_name.rfind(NAME_SEPARATOR) {
            Some(pos) => &module_name[pos + NAME_SEPARATOR.len_utf8()..],
            None => module_name,
        }
    }

    /// Bind all entry points; `init` is mandatory
    pub fn bind(library: &dyn ModuleLibrary, module_name: &str) -> Result<EntryPoints, ModuleError> {
        let prefix = Self::symbol_prefix(module_name);

        let init_symbol = format!("{}_init", prefix);
        let init = match library.lookup(&init_symbol) {
            // SAFETY: `<prefix>_init` has the `InitFn` signature by module ABI.
            Some(address) => unsafe { mem::transmute::<*mut c_void, InitFn>(address) },
            None => {
                return Err(ModuleError::MissingInitSymbol {
                    name: module_name.to_string(),
                    symbol: init_symbol,
                })
            }
        };

        let create = Self::optional(library, prefix, "_create")
            // SAFETY: `<prefix>_create` has the `CreateFn` signature by module ABI.
            .map(|address| unsafe { mem::transmute::<*mut c_void, CreateFn>(address) });
        let release = Self::optional(library, prefix, "_release")
            // SAFETY: `<prefix>_release` has the `ReleaseFn` signature by module ABI.
            .map(|address| unsafe { mem::transmute::<*mut c_void, ReleaseFn>(address) });
        let signal = Self::optional(library, prefix, "_signal")
            // SAFETY: `<prefix>_signal` has the `SignalFn` signature by module ABI.
            .map(|address| unsafe { mem::transmute::<*mut c_void, SignalFn>(address) });

        debug!(
            "Bound module {} (prefix {}): create={} release={} signal={}",
            module_name,
            prefix,
            create.is_some(),
            release.is_some(),
            signal.is_some()
        );

        Ok(EntryPoints {
            create,
            init,
            release,
            signal,
        })
    }

    fn optional(library: &dyn ModuleLibrary, prefix: &str, suffix: &str) -> Option<*mut c_void> {
        library.lookup(&format!("{}{}", prefix, suffix))
    }
}
