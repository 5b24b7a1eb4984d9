//! Service instance lifecycle
//!
//! The scheduler drives every actor through the same four calls on the
//! actor's module record: `create` when spawning, `init` once the actor
//! context exists, `signal` for out-of-band control and `release` on
//! teardown. `init` is always exported; the other three may be missing.

use std::ffi::{c_void, CString};
use std::ptr::{self, NonNull};
use tracing::debug;

use crate::module::record::ModuleRecord;
use crate::module::traits::{ModuleError, ServiceContext};

/// Per-actor state returned by a module's `create` entry point
#[must_use = "an instance must be handed to `ModuleRecord::release`"]
#[derive(Debug, PartialEq, Eq)]
pub enum ServiceInstance {
    /// The module keeps no per-instance state (it exports no `create`)
    Empty,
    /// State allocated by the module
    Handle(NonNull<c_void>),
}

// SAFETY: an instance is owned by exactly one actor, and the scheduler runs
// an actor on one worker at a time. Modules must not tie instance state to
// the thread that created it.
unsafe impl Send for ServiceInstance {}

impl ServiceInstance {
    pub fn is_empty(&self) -> bool {
        matches!(self, ServiceInstance::Empty)
    }

    /// Pointer passed to module entry points; null for `Empty`
    pub fn as_ptr(&self) -> *mut c_void {
        match self {
            ServiceInstance::Empty => ptr::null_mut(),
            ServiceInstance::Handle(handle) => handle.as_ptr(),
        }
    }
}

impl ModuleRecord {
    /// Create a new service instance
    ///
    /// Modules without a `create` entry point yield [`ServiceInstance::Empty`].
    pub fn create(&self) -> Result<ServiceInstance, ModuleError> {
        let Some(create) = self.entry.create else {
            return Ok(ServiceInstance::Empty);
        };

        // SAFETY: entry points were bound from this record's library, which
        // stays loaded for the record's lifetime.
        let raw = unsafe { create() };
        NonNull::new(raw)
            .map(ServiceInstance::Handle)
            .ok_or_else(|| ModuleError::CreateFailed(self.name().to_string()))
    }

    /// Initialize an instance against its actor context
    ///
    /// Returns the module's status code uninterpreted.
    pub fn init(
        &self,
        instance: &ServiceInstance,
        context: ServiceContext,
        parameters: Option<&str>,
    ) -> Result<i32, ModuleError> {
        let parameters = parameters
            .map(CString::new)
            .transpose()
            .map_err(|e| ModuleError::InvalidParameters {
                name: self.name().to_string(),
                reason: e.to_string(),
            })?;
        let parameters_ptr = parameters.as_ref().map_or(ptr::null(), |p| p.as_ptr());

        // SAFETY: see `create`; `parameters` outlives the call.
        let status = unsafe { (self.entry.init)(instance.as_ptr(), context.as_ptr(), parameters_ptr) };
        debug!("Module {} init returned {}", self.name(), status);
        Ok(status)
    }

    /// Release an instance, consuming it
    pub fn release(&self, instance: ServiceInstance) {
        if let Some(release) = self.entry.release {
            // SAFETY: see `create`; the instance is consumed, so it cannot be
            // released twice through this API.
            unsafe { release(instance.as_ptr()) };
        }
    }

    /// Deliver a control signal to an instance
    pub fn signal(&self, instance: &ServiceInstance, signal: i32) {
        if let Some(handler) = self.entry.signal {
            // SAFETY: see `create`.
            unsafe { handler(instance.as_ptr(), signal) };
        }
    }
}
