//! Error types for tutorial navigation and editing

use thiserror::Error;

/// Errors raised by the router and the editor helpers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TutorialError {
    /// Section id is not part of the current page
    #[error("Unknown section: {0}")]
    UnknownSection(String),

    /// Selection does not fit the text or splits a character
    #[error("Invalid selection {start}..{end} for text of {len} bytes")]
    InvalidSelection {
        start: usize,
        end: usize,
        len: usize,
    },
}

/// Result type for tutorial operations
pub type Result<T> = std::result::Result<T, TutorialError>;
