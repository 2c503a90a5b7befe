//! Error types for the joist protocol surface.
//!
//! Plugin hook failures travel as `anyhow::Error` at the hook boundary and
//! are caught and logged by the driver; this enum covers the structured
//! failures of the core types themselves.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Artifact manifest document could not be parsed or serialized.
    #[error("invalid artifact manifest: {0}")]
    ManifestParse(#[from] serde_json::Error),
}

/// Result type alias using [`CoreError`] as the default error type.
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
