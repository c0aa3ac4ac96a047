//! Environment configuration surface
//!
//! [`EnvironmentConfig`] carries the declarative options of an
//! environment: the top-level module, the default container registry,
//! the recognised configuration file names, the module-name filter
//! pattern, the resolved-resources root, and the ordered extension
//! list. The dependency resolver and bundle loader are not part of the
//! config; they are injected into [`crate::Environment`] directly.

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use env_model::{DEFAULT_MODULE_FILTER, ModuleId};

use crate::{Extension, Result};

/// Default container registry prefix for derived image references.
pub const DEFAULT_REGISTRY: &str = "docker.io";

/// Canonical per-module configuration file name.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "env.properties";

/// Declarative configuration of one environment.
#[derive(Clone)]
pub struct EnvironmentConfig {
    /// Root of the module dependency graph
    pub top_level_id: ModuleId,

    /// Registry prefix for the default image convention
    pub default_registry: String,

    /// Recognised per-module configuration file names, merged in list
    /// order (later names win) by the configurator
    pub config_file_names: Vec<String>,

    /// Module-name inclusion pattern; must have exactly one capture group
    pub module_filter_pattern: String,

    /// Root for extracted and resolved resource trees; `None` derives a
    /// process-unique temporary path
    pub resources_root: Option<PathBuf>,

    /// Transformations applied to the final module list, in order
    pub extensions: Vec<Arc<dyn Extension>>,
}

impl fmt::Debug for EnvironmentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentConfig")
            .field("top_level_id", &self.top_level_id)
            .field("default_registry", &self.default_registry)
            .field("config_file_names", &self.config_file_names)
            .field("module_filter_pattern", &self.module_filter_pattern)
            .field("resources_root", &self.resources_root)
            .field("extensions", &self.extensions.len())
            .finish()
    }
}

impl EnvironmentConfig {
    /// Start building a configuration for the given top-level module.
    pub fn builder(top_level_id: ModuleId) -> EnvironmentConfigBuilder {
        EnvironmentConfigBuilder {
            config: EnvironmentConfig {
                top_level_id,
                default_registry: DEFAULT_REGISTRY.to_string(),
                config_file_names: vec![DEFAULT_CONFIG_FILE_NAME.to_string()],
                module_filter_pattern: DEFAULT_MODULE_FILTER.to_string(),
                resources_root: None,
                extensions: Vec::new(),
            },
        }
    }

    /// Load the declarative subset from a TOML document.
    ///
    /// Returns a builder so callers can still attach extensions or
    /// override fields programmatically.
    ///
    /// ```toml
    /// top_level = "com.example:shop-env:1.4.0"
    /// default_registry = "registry.example.com"
    /// config_file_names = ["env.properties", "site.properties"]
    /// module_filter_pattern = "(.*)-env"
    /// ```
    pub fn from_toml_str(content: &str) -> Result<EnvironmentConfigBuilder> {
        let file: ConfigFile = toml::from_str(content)?;
        let top_level_id: ModuleId = file.top_level.parse().map_err(crate::Error::Model)?;
        let mut builder = Self::builder(top_level_id);
        if let Some(registry) = file.default_registry {
            builder = builder.default_registry(registry);
        }
        if let Some(names) = file.config_file_names {
            builder = builder.config_file_names(names);
        }
        if let Some(pattern) = file.module_filter_pattern {
            builder = builder.module_filter_pattern(pattern);
        }
        if let Some(root) = file.resources_root {
            builder = builder.resources_root(root);
        }
        Ok(builder)
    }
}

/// On-disk declarative subset of [`EnvironmentConfig`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    top_level: String,
    default_registry: Option<String>,
    config_file_names: Option<Vec<String>>,
    module_filter_pattern: Option<String>,
    resources_root: Option<PathBuf>,
}

/// Builder for [`EnvironmentConfig`].
#[derive(Debug)]
pub struct EnvironmentConfigBuilder {
    config: EnvironmentConfig,
}

impl EnvironmentConfigBuilder {
    pub fn default_registry(mut self, registry: impl Into<String>) -> Self {
        self.config.default_registry = registry.into();
        self
    }

    pub fn config_file_names(mut self, names: Vec<String>) -> Self {
        self.config.config_file_names = names;
        self
    }

    pub fn module_filter_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.module_filter_pattern = pattern.into();
        self
    }

    pub fn resources_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.resources_root = Some(root.into());
        self
    }

    /// Append an extension; extensions run in registration order.
    pub fn extension(mut self, extension: Arc<dyn Extension>) -> Self {
        self.config.extensions.push(extension);
        self
    }

    pub fn build(self) -> EnvironmentConfig {
        self.config
    }
}
