//! Module-name inclusion filter
//!
//! Modules participate in an environment only when their artifact name
//! matches a configurable pattern with exactly one capture group; the
//! captured text becomes the module's short name. The capture-group
//! count is validated once, at construction, never per call.

use regex::Regex;

use crate::{Error, ModuleId, Result};

/// Default pattern: strip a conventional `-env` suffix.
pub const DEFAULT_MODULE_FILTER: &str = "(.*)-env";

/// Compiled module-name filter with exactly one capture group.
#[derive(Debug, Clone)]
pub struct ModuleNameFilter {
    pattern: Regex,
}

impl ModuleNameFilter {
    /// Compile and validate a filter pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FilterPattern`] if the pattern does not compile
    /// or does not have exactly one capture group.
    pub fn new(pattern: &str) -> Result<Self> {
        let compiled = Regex::new(pattern).map_err(|e| Error::FilterPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        // captures_len counts the implicit whole-match group
        let groups = compiled.captures_len() - 1;
        if groups != 1 {
            return Err(Error::FilterPattern {
                pattern: pattern.to_string(),
                reason: format!("expected exactly 1 capture group, found {groups}"),
            });
        }
        Ok(Self { pattern: compiled })
    }

    /// Derive the short name for a module identifier.
    ///
    /// Returns `None` when the artifact name does not match, which
    /// excludes the module from the environment.
    pub fn short_name(&self, id: &ModuleId) -> Option<String> {
        self.pattern
            .captures(&id.artifact)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
    }
}

impl Default for ModuleNameFilter {
    fn default() -> Self {
        // The default pattern is a compile-time constant with one group
        Self::new(DEFAULT_MODULE_FILTER).unwrap_or_else(|_| unreachable!())
    }
}
