//! Canned dependency resolver for tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use env_core::{DependencyResolver, Result};
use env_model::{Module, ModuleId};

/// Build a module record the way a real resolver would emit it:
/// identity populated, descriptor fields empty. The artifact name is
/// `<short>-env` so the default filter pattern matches.
pub fn module(short: &str, top_level_short: &str) -> Module {
    Module::new(
        ModuleId::new("com.example", format!("{short}-env"), "1.0.0"),
        short,
        top_level_short,
    )
}

/// A [`DependencyResolver`] returning a fixed, ordered module list and
/// counting how often it was asked.
///
/// The call counter backs exactly-once assertions on the façade cache.
pub struct FixedResolver {
    modules: Vec<Module>,
    calls: Arc<AtomicUsize>,
}

impl FixedResolver {
    pub fn new(modules: Vec<Module>) -> Self {
        Self {
            modules,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared handle to the call counter, usable after the resolver has
    /// been boxed into an environment.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl DependencyResolver for FixedResolver {
    fn resolve(&self, _top_level: &ModuleId) -> Result<Vec<Module>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.modules.clone())
    }
}
