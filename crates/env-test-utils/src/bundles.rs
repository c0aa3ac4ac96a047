//! [`BundleFixture`] builder for overlay test scenarios.
//!
//! Lays out module bundle trees under a temporary base directory in the
//! layout `DirectoryBundleLoader` expects (`<base>/<short_name>/…`) and
//! owns a second temporary directory for the resolved-resources root.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use env_core::DirectoryBundleLoader;

/// Temporary bundle trees plus a resources root, with write and
/// assertion helpers.
///
/// # Example
///
/// ```rust,no_run
/// use env_test_utils::BundleFixture;
///
/// let fixture = BundleFixture::new();
/// fixture.write("service1", "service3/files/motd", "from service1");
/// fixture.props("service3", "env.properties", &[("docker.image", "none")]);
/// ```
pub struct BundleFixture {
    bundles: TempDir,
    resources: TempDir,
}

impl Default for BundleFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl BundleFixture {
    /// Create empty bundle and resources directories.
    pub fn new() -> Self {
        Self {
            bundles: TempDir::new().expect("BundleFixture: failed to create bundle dir"),
            resources: TempDir::new().expect("BundleFixture: failed to create resources dir"),
        }
    }

    /// Base directory holding one subdirectory per module bundle.
    pub fn bundle_base(&self) -> &Path {
        self.bundles.path()
    }

    /// Root for the environment's extracted and resolved trees.
    pub fn resources_root(&self) -> &Path {
        self.resources.path()
    }

    /// A loader over the fixture's bundle base.
    pub fn loader(&self) -> DirectoryBundleLoader {
        DirectoryBundleLoader::new(self.bundle_base())
    }

    /// Write one file into a module's bundle, creating parents.
    pub fn write(&self, module: &str, rel: &str, content: &str) {
        let path = self.bundles.path().join(module).join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
    }

    /// Write a properties file into a module's bundle.
    pub fn props(&self, module: &str, rel: &str, entries: &[(&str, &str)]) {
        let content: String = entries
            .iter()
            .map(|(key, value)| format!("{key}={value}\n"))
            .collect();
        self.write(module, rel, &content);
    }

    /// Read a file from the resolved area, relative to the resources
    /// root (e.g. `resolved/service3/files/motd`).
    ///
    /// # Panics
    /// Panics with a descriptive message if the file cannot be read.
    pub fn read_resolved(&self, rel: &str) -> String {
        let path = self.resources.path().join(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read resolved file: {}", path.display()))
    }

    /// Assert that `rel` (relative to the resources root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_resolved_exists(&self, rel: &str) {
        let path = self.resources.path().join(rel);
        assert!(
            path.exists(),
            "Expected resolved path to exist: {}",
            path.display()
        );
    }

    /// Assert that `rel` (relative to the resources root) does **not**
    /// exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_resolved_not_exists(&self, rel: &str) {
        let path = self.resources.path().join(rel);
        assert!(
            !path.exists(),
            "Expected resolved path NOT to exist: {}",
            path.display()
        );
    }
}
