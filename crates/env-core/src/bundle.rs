//! Bundle loader contract and the directory-backed implementation

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use env_fs::{checksum, io, walk};
use env_model::Module;

use crate::{Error, Result};

/// Stages a module's packaged resource bundle onto the working
/// filesystem area.
///
/// `dest` is the module's extraction directory
/// (`<root>/expanded/<short_name>/`); after `load` returns it must hold
/// the bundle's content, honouring the recognised sub-path conventions
/// (`files/`, `env/`, configuration files, `<target>/…` cross-module
/// contributions). Loading must be idempotent: re-loading an unchanged
/// bundle leaves identical bytes in place.
pub trait BundleLoader: Send + Sync {
    fn load(&self, module: &Module, dest: &Path) -> Result<()>;
}

/// Loads bundles from a base directory laid out as
/// `<base>/<short_name>/…`.
///
/// Suitable for locally built module trees and tests. Files already
/// present at the destination with a matching checksum are left alone,
/// so repeated extraction of unchanged bundles does not rewrite bytes.
#[derive(Debug, Clone)]
pub struct DirectoryBundleLoader {
    base: PathBuf,
}

impl DirectoryBundleLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }
}

impl BundleLoader for DirectoryBundleLoader {
    fn load(&self, module: &Module, dest: &Path) -> Result<()> {
        let source = self.base.join(&module.short_name);
        if !source.is_dir() {
            // A module may ship no resources at all
            debug!(module = %module.short_name, "no bundle directory, staging nothing");
            return Ok(());
        }
        let files = walk::walk_relative(&source).map_err(|e| Error::Bundle {
            short_name: module.short_name.clone(),
            message: e.to_string(),
        })?;
        for rel in files {
            let from = source.join(&rel);
            let to = dest.join(&rel);
            if to.is_file() && checksum::file_checksum(&to)? == checksum::file_checksum(&from)? {
                continue;
            }
            io::copy_file(&from, &to)?;
        }
        Ok(())
    }
}

/// Extract every module's bundle into `<root>/expanded/<short_name>/`.
///
/// Extraction is independent per module; order does not influence
/// overlay precedence, which is fixed by list index.
pub fn extract_all(
    loader: &dyn BundleLoader,
    modules: &[Module],
    expanded_root: &Path,
) -> Result<()> {
    for module in modules {
        let dest = expanded_root.join(&module.short_name);
        fs::create_dir_all(&dest).map_err(|e| env_fs::Error::io(&dest, e))?;
        debug!(module = %module.short_name, "staging bundle");
        loader.load(module, &dest)?;
    }
    Ok(())
}
