//! Error types for genre-rank.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`GenreError`] enum.
//!
//! # Examples
//!
//! ```
//! use genre_rank::error::{GenreError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(GenreError::invalid_argument("empty category name"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for genre-rank operations.
///
/// Storage failures are fatal: nothing in the crate retries them.
#[derive(Error, Debug)]
pub enum GenreError {
    /// I/O errors (data directory, corpus files, metadata files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Storage errors (frequency/rank database, storage backends)
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration or incompatible persisted metadata
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid argument passed by the caller
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Classification requested before any category was trained
    #[error("No categories have been trained")]
    NoCategories,

    /// Classification requested while rank tables are stale
    #[error("Rank tables are stale; call finalize() before classify()")]
    NotFinalized,
}

/// Result type alias for operations that may fail with GenreError.
pub type Result<T> = std::result::Result<T, GenreError>;

impl GenreError {
    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        GenreError::Storage(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        GenreError::InvalidConfig(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        GenreError::InvalidArgument(msg.into())
    }

    /// Whether this error came from the storage layer.
    pub fn is_storage(&self) -> bool {
        matches!(self, GenreError::Storage(_) | GenreError::Io(_))
    }
}

macro_rules! impl_from_redb {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for GenreError {
                fn from(err: $ty) -> Self {
                    GenreError::storage(err.to_string())
                }
            }
        )*
    };
}

impl_from_redb!(
    redb::Error,
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = GenreError::storage("corrupt table");
        assert_eq!(error.to_string(), "Storage error: corrupt table");

        let error = GenreError::invalid_config("orders must not be empty");
        assert_eq!(
            error.to_string(),
            "Invalid configuration: orders must not be empty"
        );

        let error = GenreError::invalid_argument("empty category");
        assert_eq!(error.to_string(), "Invalid argument: empty category");

        assert_eq!(
            GenreError::NoCategories.to_string(),
            "No categories have been trained"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let genre_error = GenreError::from(io_error);

        match genre_error {
            GenreError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
        assert!(GenreError::storage("x").is_storage());
        assert!(!GenreError::NotFinalized.is_storage());
    }
}
