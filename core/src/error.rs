use std::path::PathBuf;

use thiserror::Error;

/// Please error types
#[derive(Error, Debug)]
pub enum PleaseError {
    /// Catalog archive does not exist or cannot be opened
    #[error("Manifest archive not found: {}", path.display())]
    MissingFile { path: PathBuf },

    /// Bad gzip or tar framing, or an I/O failure mid-stream
    #[error("Corrupt manifest archive {}: {message}", path.display())]
    CorruptArchive { path: PathBuf, message: String },

    /// No root-level JSON member inside the archive
    #[error("No JSON manifest member found at root of {}", path.display())]
    NoStructuredMember { path: PathBuf },

    /// JSON shape differs from the catalog layout
    #[error("Unexpected token in {}: expected {expected}, got {found}", path.display())]
    UnexpectedToken {
        path: PathBuf,
        expected: String,
        found: String,
    },

    /// Malformed JSON or an element that is not a package manifest
    #[error("Failed to decode manifest in {}: {message}", path.display())]
    DecodeError { path: PathBuf, message: String },

    /// Exact lookup miss
    #[error("Package with name '{name}' not found")]
    NotFound { name: String },

    /// Version filter pattern failed to compile
    #[error("Invalid version pattern '{pattern}': {message}")]
    PatternError { pattern: String, message: String },

    /// Registry token endpoint failure
    #[error("Registry auth error: {registry} - {message}")]
    AuthError { registry: String, message: String },

    /// Container registry error
    #[error("Registry error: {registry} - {message}")]
    RegistryError { registry: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Timeout error
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl PleaseError {
    /// Whether this error is an expected lookup miss rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PleaseError::NotFound { .. })
    }
}

impl From<serde_json::Error> for PleaseError {
    fn from(err: serde_json::Error) -> Self {
        PleaseError::SerializationError(err.to_string())
    }
}

/// Result type alias for Please operations
pub type Result<T> = std::result::Result<T, PleaseError>;
