//! Environment façade
//!
//! Orchestrates the full pipeline — resolve dependency graph, extract
//! bundles, resolve overlays, configure modules, run extensions — and
//! memoises the result for the lifetime of the instance.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;
use uuid::Uuid;

use env_model::{Module, ModuleId, ModuleNameFilter};

use crate::bundle::BundleLoader;
use crate::configure::ModuleConfigurator;
use crate::repository::ResourceRepository;
use crate::resolver::DependencyResolver;
use crate::{EnvironmentConfig, Error, Result};

/// A composed multi-service environment.
///
/// Construction validates the module filter pattern and the top-level
/// module's short name immediately; the expensive pipeline runs lazily
/// on the first [`Environment::modules`] call and exactly once per
/// instance, even under concurrent first access.
///
/// Two instances must not share a resources root; the default root is
/// unique per instance.
pub struct Environment {
    config: EnvironmentConfig,
    filter: ModuleNameFilter,
    top_level_short_name: String,
    resolver: Box<dyn DependencyResolver>,
    loader: Box<dyn BundleLoader>,
    repository: ResourceRepository,
    // Guarded cache slot; the lock is held across the first compute so
    // concurrent first callers serialise and all observe one list.
    modules: Mutex<Option<Arc<[Module]>>>,
}

impl Environment {
    /// Create an environment with its external collaborators injected.
    ///
    /// # Errors
    ///
    /// Fails fast with a definition error if the filter pattern does not
    /// have exactly one capture group, or if the top-level module's own
    /// artifact name does not match the filter.
    pub fn new(
        config: EnvironmentConfig,
        resolver: Box<dyn DependencyResolver>,
        loader: Box<dyn BundleLoader>,
    ) -> Result<Self> {
        debug!(?config, "creating environment");
        let filter = ModuleNameFilter::new(&config.module_filter_pattern)?;
        let top_level_short_name =
            filter
                .short_name(&config.top_level_id)
                .ok_or_else(|| Error::TopLevelFiltered {
                    id: config.top_level_id.clone(),
                })?;

        let root = config
            .resources_root
            .clone()
            .unwrap_or_else(default_resources_root);
        let repository = ResourceRepository::new(root, config.config_file_names.clone());

        Ok(Self {
            config,
            filter,
            top_level_short_name,
            resolver,
            loader,
            repository,
            modules: Mutex::new(None),
        })
    }

    /// The final ordered module list with fully populated runtime
    /// descriptors — the sole hand-off artifact.
    ///
    /// The pipeline runs on the first call; every later call returns the
    /// cached list. Callers see either a complete, consistent list or an
    /// error, never a partially built one.
    pub fn modules(&self) -> Result<Arc<[Module]>> {
        let mut slot = self
            .modules
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = slot.as_ref() {
            return Ok(Arc::clone(cached));
        }
        let modules: Arc<[Module]> = self.compute_modules()?.into();
        *slot = Some(Arc::clone(&modules));
        Ok(modules)
    }

    fn compute_modules(&self) -> Result<Vec<Module>> {
        debug!(top_level = %self.config.top_level_id, "resolving module dependency graph");
        let modules = self.resolver.resolve(&self.config.top_level_id)?;

        debug!(count = modules.len(), "extracting module bundles");
        self.repository.extract(&modules, self.loader.as_ref())?;

        debug!("resolving resource overlays");
        self.repository.resolve_overlays(&modules)?;

        debug!("deriving runtime descriptors");
        let configurator = ModuleConfigurator::new(
            &self.repository,
            &self.config.default_registry,
            &self.config.config_file_names,
        );
        let mut modules = modules
            .iter()
            .map(|module| configurator.configure(module))
            .collect::<Result<Vec<_>>>()?;

        for extension in &self.config.extensions {
            debug!(extension = extension.name(), "applying extension");
            modules = extension.apply(self, modules)?;
        }

        Ok(modules)
    }

    /// Root of the working area holding extracted and resolved trees.
    pub fn resources_root(&self) -> &Path {
        self.repository.root()
    }

    /// Resolved tree of one module, for extensions and the backend.
    pub fn module_resolved_path(&self, module: &Module) -> PathBuf {
        self.repository.resolved_path(&module.short_name)
    }

    /// Short name of the top-level module.
    pub fn top_level_short_name(&self) -> &str {
        &self.top_level_short_name
    }

    /// Derive the short name for an arbitrary module identifier, `None`
    /// when the identifier is excluded by the filter.
    pub fn short_name(&self, id: &ModuleId) -> Option<String> {
        self.filter.short_name(id)
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("config", &self.config)
            .field("top_level_short_name", &self.top_level_short_name)
            .finish_non_exhaustive()
    }
}

fn default_resources_root() -> PathBuf {
    std::env::temp_dir().join(format!("env-composer-{}", Uuid::new_v4().simple()))
}
