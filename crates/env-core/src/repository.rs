//! Resource overlay resolution engine
//!
//! For every destination module the engine layers contribution sources
//! in ascending precedence — the destination's own bundle first, then
//! every other module's cross-module contribution in list order — and
//! materialises one resolved tree per destination under
//! `<root>/resolved/<short_name>/`.
//!
//! Two merge strategies, selected per file:
//!
//! - **whole-file override** for `files/` and `env/` contributions: the
//!   highest-precedence layer defining a relative path wins outright;
//! - **key-level merge** for properties files (a recognised
//!   configuration file name or any `*.properties`): keys are unioned
//!   across layers, the highest-precedence layer wins per key,
//!   independently per file path.
//!
//! Each destination's tree is computed in a staging directory and
//! published with a single rename, so a failed resolve never leaves a
//! partially overlaid tree visible. Walks are sorted and merged
//! properties serialise in key order; re-resolving unchanged bundles is
//! byte-identical.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use env_fs::{io, props, walk};
use env_model::Module;

use crate::bundle::{self, BundleLoader};
use crate::Result;

const EXPANDED_DIR: &str = "expanded";
const RESOLVED_DIR: &str = "resolved";

/// Whole-file contribution kinds recognised in a bundle.
const OVERRIDE_KINDS: [&str; 2] = ["files", "env"];

/// Working area holding extracted bundles and resolved trees.
pub struct ResourceRepository {
    root: PathBuf,
    config_file_names: Vec<String>,
}

impl ResourceRepository {
    pub fn new(root: impl Into<PathBuf>, config_file_names: Vec<String>) -> Self {
        Self {
            root: root.into(),
            config_file_names,
        }
    }

    /// Root of the working area.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Extraction directory for one module's bundle.
    pub fn expanded_path(&self, short_name: &str) -> PathBuf {
        self.root.join(EXPANDED_DIR).join(short_name)
    }

    /// Resolved tree for one destination module.
    pub fn resolved_path(&self, short_name: &str) -> PathBuf {
        self.root.join(RESOLVED_DIR).join(short_name)
    }

    /// Stage every module's bundle into the expanded area.
    pub fn extract(&self, modules: &[Module], loader: &dyn BundleLoader) -> Result<()> {
        bundle::extract_all(loader, modules, &self.root.join(EXPANDED_DIR))
    }

    /// Resolve the overlay for every destination module in the list.
    ///
    /// The list order is the overlay precedence, ascending; it was fixed
    /// by the dependency resolver and is not reinterpreted here.
    pub fn resolve_overlays(&self, modules: &[Module]) -> Result<()> {
        for destination in modules {
            self.resolve_destination(destination, modules)?;
        }
        Ok(())
    }

    /// Compute one destination's resolved tree and publish it atomically.
    fn resolve_destination(&self, destination: &Module, modules: &[Module]) -> Result<()> {
        let short = &destination.short_name;
        let staging = self
            .root
            .join(RESOLVED_DIR)
            .join(format!(".staging-{short}"));
        if staging.exists() {
            fs::remove_dir_all(&staging).map_err(|e| env_fs::Error::io(&staging, e))?;
        }
        fs::create_dir_all(&staging).map_err(|e| env_fs::Error::io(&staging, e))?;

        // Lowest precedence: the destination's own self-contribution
        debug!(module = %short, "applying self-contribution");
        self.apply_layer(&self.expanded_path(short), &staging, short)?;

        // Then every other module's cross-module contribution, in list order
        for contributor in modules {
            if contributor.id == destination.id {
                continue;
            }
            let layer = self.expanded_path(&contributor.short_name).join(short);
            if layer.is_dir() {
                debug!(from = %contributor.short_name, to = %short, "applying cross-module contribution");
                self.apply_layer(&layer, &staging, short)?;
            }
        }

        // All-or-nothing publish
        let target = self.resolved_path(short);
        if target.exists() {
            fs::remove_dir_all(&target).map_err(|e| env_fs::Error::io(&target, e))?;
        }
        fs::rename(&staging, &target).map_err(|e| env_fs::Error::io(&target, e))?;
        Ok(())
    }

    /// Apply one contribution layer onto the staging tree.
    ///
    /// Whole-file kinds overwrite; merge-kind files union keys with this
    /// layer winning. Enumeration failures of the optional kinds are
    /// tolerated (that layer contributes nothing of the kind); read
    /// failures of a merge-kind file abort the resolve.
    fn apply_layer(&self, layer: &Path, staging: &Path, destination: &str) -> Result<()> {
        for kind in OVERRIDE_KINDS {
            let kind_root = layer.join(kind);
            let entries = match walk::walk_relative(&kind_root) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(
                        module = destination,
                        kind,
                        error = %e,
                        "skipping unreadable contribution directory"
                    );
                    continue;
                }
            };
            for rel in entries {
                let from = kind_root.join(&rel);
                let to = staging.join(kind).join(&rel);
                if self.is_merge_file(&from) {
                    merge_into(&from, &to)?;
                } else {
                    io::copy_file(&from, &to)?;
                }
            }
        }

        // Recognised configuration files at the layer root are merge-kind
        for name in &self.config_file_names {
            let from = layer.join(name);
            if from.is_file() {
                merge_into(&from, &staging.join(name))?;
            }
        }
        Ok(())
    }

    /// A file is merge-kind when its name is a recognised configuration
    /// file name or carries the `.properties` extension, wherever it
    /// sits in the tree. Every other file is whole-file override.
    fn is_merge_file(&self, path: &Path) -> bool {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };
        self.config_file_names.iter().any(|n| n == name)
            || Path::new(name)
                .extension()
                .is_some_and(|ext| ext == "properties")
    }
}

/// Key-merge one layer's properties file into the staging tree.
///
/// The layer's keys win over whatever earlier layers left at `to`. The
/// result is rewritten in sorted key order, so the bytes depend only on
/// the merged map.
fn merge_into(from: &Path, to: &Path) -> Result<()> {
    let overlay = props::read_file(from)?;
    let mut merged: BTreeMap<String, String> = if to.is_file() {
        props::read_file(to)?
    } else {
        BTreeMap::new()
    };
    merged.extend(overlay);
    props::write_file(to, &merged)?;
    Ok(())
}
