//! Error types for favorites storage and enumeration
//!
//! This module defines the error types used throughout the favkit library.
//! All public functions return [`Result<T, Error>`] for consistent error handling.

use std::path::PathBuf;

/// Errors that can occur while saving, listing or deleting favorites
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The query context is missing a field the operation needs
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The favorites directory does not exist yet
    #[error("No favorites directory at {directory}")]
    StoreMissing { directory: PathBuf },

    /// A stored record could not be read back
    #[error("Corrupt favorite record '{name}': {message}")]
    RecordCorrupt { name: String, message: String },

    /// A record could not be serialized for storage
    #[error("Failed to serialize record: {0}")]
    RecordEncode(#[from] serde_json::Error),

    /// The requested category is not a valid match pattern
    #[error("Invalid category pattern '{pattern}': {message}")]
    InvalidCategoryPattern { pattern: String, message: String },

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
///
/// All public functions in the favkit library return this type alias for
/// consistent error handling.
///
/// # Example
///
/// ```rust
/// use favkit::{Result, parse_query};
///
/// fn mode_of(query: &str) -> Result<String> {
///     let ctx = parse_query(query);
///     Ok(ctx["mode"].as_str().unwrap_or_default().to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;
