//! Error types for env-core

use env_model::ModuleId;

/// Result type for env-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while composing an environment
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The top-level module's artifact name does not match the module
    /// name filter, so no short name can be derived for it
    #[error("top-level module {id} does not match the module name filter")]
    TopLevelFiltered { id: ModuleId },

    /// The dependency graph resolver failed
    #[error("dependency resolution failed for {id}: {message}")]
    Resolve { id: ModuleId, message: String },

    /// A module's packaged bundle could not be staged
    #[error("bundle staging failed for module {short_name}: {message}")]
    Bundle { short_name: String, message: String },

    /// An extension failed; extension errors abort the whole pipeline
    #[error("extension {name} failed: {message}")]
    Extension { name: String, message: String },

    // Transparent wrappers for underlying crate errors
    /// Definition error from env-model
    #[error(transparent)]
    Model(#[from] env_model::Error),

    /// Filesystem error from env-fs
    #[error(transparent)]
    Fs(#[from] env_fs::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}
