//! Error types for diagram operations
//!
//! Pipeline failures never surface as `Err`: they become a
//! [`RenderOutcome::Failed`](crate::outcome::RenderOutcome). The errors here
//! cover configuration and the two external seams (encoder, image loader).

use thiserror::Error;

/// Errors raised while building or configuring the preview pipeline
#[derive(Error, Debug)]
pub enum DiagramError {
    /// Endpoint template is unusable
    #[error("Invalid endpoint '{name}': {reason}")]
    InvalidEndpoint {
        name: String,
        reason: String,
    },

    /// Configuration could not be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for diagram operations
pub type Result<T> = std::result::Result<T, DiagramError>;

/// Error reported by an encoding capability
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct EncodeError(pub String);

impl EncodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Why a single image load attempt failed
///
/// All variants are treated alike by the pipeline: the attempt failed and
/// the next endpoint is tried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Connection, DNS or TLS failure
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("Server returned status {0}")]
    Status(u16),

    /// Body was not a decodable image
    #[error("Response is not a PNG image ({0} bytes)")]
    NotAnImage(usize),

    /// Attempt did not finish in time
    #[error("Timed out after {0} ms")]
    Timeout(u128),
}
