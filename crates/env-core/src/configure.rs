//! Runtime descriptor derivation
//!
//! Reads a module's resolved tree and derives the fields the
//! orchestration backend consumes: container image, entrypoint,
//! command, bind mounts, env files.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::warn;

use env_fs::{props, walk};
use env_model::{Module, Volume};

use crate::{ResourceRepository, Result};

/// Configuration key overriding the derived image reference.
pub const IMAGE_KEY: &str = "docker.image";
/// Configuration key setting the container entrypoint.
pub const ENTRYPOINT_KEY: &str = "docker.entrypoint";
/// Configuration key setting the container command.
pub const COMMAND_KEY: &str = "docker.cmd";
/// Sentinel image value marking a config-only module.
pub const IMAGE_NONE: &str = "none";

/// Derives runtime descriptors from resolved module trees.
pub struct ModuleConfigurator<'a> {
    repository: &'a ResourceRepository,
    default_registry: &'a str,
    config_file_names: &'a [String],
}

impl<'a> ModuleConfigurator<'a> {
    pub fn new(
        repository: &'a ResourceRepository,
        default_registry: &'a str,
        config_file_names: &'a [String],
    ) -> Self {
        Self {
            repository,
            default_registry,
            config_file_names,
        }
    }

    /// Derive one module's runtime descriptor.
    ///
    /// Pure with respect to the input module: returns a new value, the
    /// input is untouched.
    pub fn configure(&self, module: &Module) -> Result<Module> {
        let resolved = self.repository.resolved_path(&module.short_name);

        let properties = self.read_properties(&resolved)?;

        // Default convention, overridable through configuration
        let mut image = Some(format!(
            "{}/{}:{}",
            self.default_registry, module.short_name, module.id.version
        ));
        if let Some(custom) = properties.get(IMAGE_KEY) {
            image = Some(custom.clone());
        }
        // The sentinel disables the container entirely (config-only module)
        if image.as_deref() == Some(IMAGE_NONE) {
            image = None;
        }

        Ok(module
            .to_builder()
            .image(image)
            .entrypoint(properties.get(ENTRYPOINT_KEY).cloned())
            .command(properties.get(COMMAND_KEY).cloned())
            .volumes(self.file_volumes(module, &resolved))
            .env_files(self.env_files(module, &resolved))
            .properties(properties)
            .build())
    }

    /// Merge the configured configuration files found at the resolved
    /// root, in list order — the last listed name wins per key. This is
    /// local to one module's own files; cross-module merging already
    /// happened during overlay resolution.
    fn read_properties(&self, resolved: &Path) -> Result<BTreeMap<String, String>> {
        let mut properties = BTreeMap::new();
        for name in self.config_file_names {
            let path = resolved.join(name);
            if path.is_file() {
                properties.extend(props::read_file(&path)?);
            }
        }
        Ok(properties)
    }

    /// Every file under `files/` becomes a bind mount; the container
    /// path is the absolute path obtained by stripping the `files/`
    /// segment.
    fn file_volumes(&self, module: &Module, resolved: &Path) -> BTreeSet<Volume> {
        let files_root = resolved.join("files");
        let entries = match walk::walk_relative(&files_root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(module = %module.short_name, error = %e, "cannot enumerate files to mount");
                return BTreeSet::new();
            }
        };
        entries
            .into_iter()
            .map(|rel| Volume::new(files_root.join(&rel), Path::new("/").join(rel)))
            .collect()
    }

    /// Every file under `env/` is an env file for the container.
    fn env_files(&self, module: &Module, resolved: &Path) -> BTreeSet<PathBuf> {
        match walk::walk_files(&resolved.join("env")) {
            Ok(files) => files.into_iter().collect(),
            Err(e) => {
                warn!(module = %module.short_name, error = %e, "cannot enumerate env files");
                BTreeSet::new()
            }
        }
    }
}
