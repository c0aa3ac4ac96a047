//! Filesystem substrate for Environment Composer
//!
//! Provides the low-level pieces shared by the overlay engine and the
//! module configurator:
//!
//! - path-tagged I/O errors
//! - atomic writes (temp + rename with advisory locking)
//! - deterministic recursive file walks
//! - SHA-256 checksums in canonical `sha256:<hex>` form
//! - the `key=value` properties file codec

pub mod checksum;
pub mod error;
pub mod io;
pub mod props;
pub mod walk;

pub use error::{Error, Result};
