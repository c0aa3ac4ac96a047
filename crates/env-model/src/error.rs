//! Definition errors for the module value model

/// Result type for env-model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while defining module identities and filters
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The module-name filter pattern is invalid or does not have exactly
    /// one capture group
    #[error("invalid module filter pattern {pattern:?}: {reason}")]
    FilterPattern { pattern: String, reason: String },

    /// Module coordinates from an upstream source could not be parsed
    #[error("malformed module coordinates {input:?}: expected group:artifact:version")]
    Coordinates { input: String },
}
