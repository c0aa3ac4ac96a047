//! Module records and their rebuild-with-changes builder

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::ModuleId;

/// One bind mount: a host file projected to an absolute container path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Volume {
    pub host: PathBuf,
    pub container: PathBuf,
}

impl Volume {
    pub fn new(host: impl Into<PathBuf>, container: impl Into<PathBuf>) -> Self {
        Self {
            host: host.into(),
            container: container.into(),
        }
    }
}

/// One participant in a composed environment.
///
/// Produced by pure transforms: each pipeline stage derives a new value
/// via [`Module::to_builder`] instead of mutating in place. `volumes` and
/// `env_files` are plain sets, empty when the module contributes nothing
/// of that kind; `image: None` marks a config-only module with no
/// deployable container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub short_name: String,
    pub top_level_short_name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub entrypoint: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub volumes: BTreeSet<Volume>,
    #[serde(default)]
    pub env_files: BTreeSet<PathBuf>,
}

impl Module {
    /// Create a module record as the dependency resolver emits it:
    /// identity populated, runtime descriptor fields still empty.
    pub fn new(
        id: ModuleId,
        short_name: impl Into<String>,
        top_level_short_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            short_name: short_name.into(),
            top_level_short_name: top_level_short_name.into(),
            properties: BTreeMap::new(),
            image: None,
            entrypoint: None,
            command: None,
            volumes: BTreeSet::new(),
            env_files: BTreeSet::new(),
        }
    }

    /// Start a rebuild of this module with changed fields.
    pub fn to_builder(&self) -> ModuleBuilder {
        ModuleBuilder {
            module: self.clone(),
        }
    }
}

/// Builder over a cloned [`Module`], used by pipeline stages to derive
/// the next value without touching the previous one.
#[derive(Debug, Clone)]
pub struct ModuleBuilder {
    module: Module,
}

impl ModuleBuilder {
    pub fn properties(mut self, properties: BTreeMap<String, String>) -> Self {
        self.module.properties = properties;
        self
    }

    pub fn image(mut self, image: Option<String>) -> Self {
        self.module.image = image;
        self
    }

    pub fn entrypoint(mut self, entrypoint: Option<String>) -> Self {
        self.module.entrypoint = entrypoint;
        self
    }

    pub fn command(mut self, command: Option<String>) -> Self {
        self.module.command = command;
        self
    }

    pub fn volumes(mut self, volumes: BTreeSet<Volume>) -> Self {
        self.module.volumes = volumes;
        self
    }

    pub fn env_files(mut self, env_files: BTreeSet<PathBuf>) -> Self {
        self.module.env_files = env_files;
        self
    }

    pub fn build(self) -> Module {
        self.module
    }
}
