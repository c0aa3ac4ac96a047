//! SHA-256 checksum utilities
//!
//! A single canonical checksum format (`sha256:<hex>`) used to detect
//! unchanged files during re-extraction and to compare resolved trees
//! in idempotence tests.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use crate::{Error, Result};

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Compute the SHA-256 checksum of in-memory content.
pub fn content_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Compute the SHA-256 checksum of a file's contents.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn file_checksum(path: &Path) -> Result<String> {
    let content = fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(content_checksum(&content))
}
