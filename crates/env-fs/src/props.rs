//! `key=value` properties file codec
//!
//! The on-disk configuration format for module bundles. Parsing follows
//! the conventional properties rules: blank lines and lines starting
//! with `#` or `!` are ignored, the first `=` or `:` splits key from
//! value, both sides are trimmed, and a line without a separator is a
//! key with an empty value. Backslash escapes are not interpreted.
//!
//! Serialisation always emits keys in sorted order with `=` separators,
//! so re-writing an unchanged map is byte-identical. The overlay
//! engine's idempotence guarantee depends on this.

use std::collections::BTreeMap;
use std::path::Path;

use crate::{io, Result};

/// Parse properties file content into a sorted key/value map.
pub fn parse_str(content: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        match line.find(['=', ':']) {
            Some(idx) => {
                let key = line[..idx].trim();
                let value = line[idx + 1..].trim();
                if !key.is_empty() {
                    map.insert(key.to_string(), value.to_string());
                }
            }
            None => {
                map.insert(line.to_string(), String::new());
            }
        }
    }
    map
}

/// Serialise a map to properties file content, keys sorted.
pub fn to_string(map: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    for (key, value) in map {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    out
}

/// Read and parse a properties file.
pub fn read_file(path: &Path) -> Result<BTreeMap<String, String>> {
    Ok(parse_str(&io::read_text(path)?))
}

/// Write a map as a properties file, atomically.
pub fn write_file(path: &Path, map: &BTreeMap<String, String>) -> Result<()> {
    io::write_atomic(path, to_string(map).as_bytes())
}
