//! Deterministic recursive directory walks
//!
//! All walks return lexicographically sorted paths so every consumer
//! (overlay layering, volume discovery, checksumming) sees files in a
//! stable order regardless of filesystem enumeration order.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Recursively enumerate all regular files under `root`, sorted.
///
/// Returns absolute paths. A missing `root` yields an empty list rather
/// than an error; callers treat absent directories as "contributes
/// nothing".
pub fn walk_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !root.exists() {
        return Ok(files);
    }
    collect(root, &mut files)?;
    files.sort();
    Ok(files)
}

/// Like [`walk_files`], but paths are returned relative to `root`.
pub fn walk_relative(root: &Path) -> Result<Vec<PathBuf>> {
    let files = walk_files(root)?;
    files
        .into_iter()
        .map(|p| {
            p.strip_prefix(root)
                .map(Path::to_path_buf)
                // strip_prefix cannot fail: every path came from a walk of root
                .map_err(|_| Error::io(&p, std::io::Error::other("path escaped walk root")))
        })
        .collect()
}

fn collect(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| Error::io(&path, e))?;
        if file_type.is_dir() {
            collect(&path, files)?;
        } else if file_type.is_file() {
            files.push(path);
        }
        // Symlinks and other special entries are skipped
    }
    Ok(())
}
