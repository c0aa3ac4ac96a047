//! Overlay resolution engine and environment façade
//!
//! This crate composes a multi-service local runtime environment from a
//! graph of declared application modules:
//!
//! - **Overlay resolution**: merges per-module and cross-module resource
//!   contributions into one resolved tree per destination module, with
//!   whole-file override for `files/` and `env/` contributions and
//!   key-level merge for properties files.
//! - **Module configuration**: derives each module's runtime descriptor
//!   (image, entrypoint, command, bind mounts, env files) from its
//!   resolved tree.
//! - **Environment façade**: sequences resolve → extract → overlay →
//!   configure → extend, memoising the result exactly once.
//!
//! # Architecture
//!
//! ```text
//!                  orchestration backend
//!                          |
//!                      env-core
//!                          |
//!                  +-------+-------+
//!                  |               |
//!               env-fs         env-model
//! ```
//!
//! The dependency-graph resolver and the bundle loader are external
//! collaborators, injected as trait objects at construction.

pub mod bundle;
pub mod config;
pub mod configure;
pub mod environment;
pub mod error;
pub mod extension;
pub mod logging;
pub mod repository;
pub mod resolver;

pub use bundle::{BundleLoader, DirectoryBundleLoader};
pub use config::{
    DEFAULT_CONFIG_FILE_NAME, DEFAULT_REGISTRY, EnvironmentConfig, EnvironmentConfigBuilder,
};
pub use configure::ModuleConfigurator;
pub use environment::Environment;
pub use error::{Error, Result};
pub use extension::Extension;
pub use repository::ResourceRepository;
pub use resolver::DependencyResolver;
