//! Error types for the Brewery engine.
//!
//! Recipe mismatches are not errors: they are reported as defects inside an
//! evaluation. These types cover I/O, persisted formats and content loading.

use crate::version::SchemaVersion;
use thiserror::Error;

/// Top-level error type for Brewery operations.
#[derive(Debug, Error)]
pub enum BreweryError {
    /// Encoded ingredient errors
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Recipe book errors
    #[error("Recipe book error: {0}")]
    Book(#[from] BookError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid command or simulation input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors from encoding or decoding an ingredient aggregate.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Invalid magic bytes
    #[error("Invalid ingredient data format")]
    InvalidFormat,

    /// Data written by an unreadable schema version
    #[error("Incompatible ingredient data version: expected {expected}, found {found}")]
    VersionMismatch {
        /// Version this build writes
        expected: SchemaVersion,
        /// Version found in the data
        found: SchemaVersion,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Payload could not be decoded
    #[error("Ingredient data corrupted: {0}")]
    Corrupted(String),
}

/// Errors from loading or building a recipe book.
#[derive(Debug, Error)]
pub enum BookError {
    /// IO error while reading a book file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File extension not recognized
    #[error("Unsupported recipe book format: {0}")]
    UnsupportedFormat(String),

    /// File contents could not be parsed
    #[error("Failed to parse recipe book: {0}")]
    Parse(String),

    /// Two recipes share a name
    #[error("Duplicate recipe name: {0}")]
    DuplicateRecipe(String),

    /// A recipe definition is unusable
    #[error("Invalid recipe '{recipe}': {reason}")]
    InvalidRecipe {
        /// Recipe name
        recipe: String,
        /// What is wrong with it
        reason: String,
    },

    /// Book written by an unreadable schema version
    #[error("Incompatible recipe book version: expected {expected}, found {found}")]
    VersionMismatch {
        /// Version this build reads
        expected: SchemaVersion,
        /// Version declared in the file
        found: SchemaVersion,
    },
}

/// Result type alias for Brewery operations.
pub type BreweryResult<T> = Result<T, BreweryError>;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Result type for recipe book operations.
pub type BookResult<T> = Result<T, BookError>;
