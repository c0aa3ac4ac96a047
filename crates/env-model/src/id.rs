//! Module coordinates

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Immutable coordinates identifying one module version.
///
/// Equality is by value; the canonical textual form is
/// `group:artifact:version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl ModuleId {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

impl FromStr for ModuleId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(group), Some(artifact), Some(version), None)
                if !group.is_empty() && !artifact.is_empty() && !version.is_empty() =>
            {
                Ok(Self::new(group, artifact, version))
            }
            _ => Err(Error::Coordinates {
                input: s.to_string(),
            }),
        }
    }
}
