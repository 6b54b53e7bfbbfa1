//! Custom error types for the common library
//!
//! This module defines the error type shared by every store backend. The
//! caller-facing error taxonomy lives in the `api` crate and converts from
//! this type.

use thiserror::Error;

/// Custom error type for store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Inserting the document would violate a uniqueness invariant
    #[error("duplicate {collection} document: {detail}")]
    Duplicate {
        /// Collection the insert was attempted against
        collection: &'static str,
        /// Which invariant was violated
        detail: String,
    },

    /// The underlying store call failed
    #[error("store backend error: {0}")]
    Backend(String),

    /// The store returned a row that does not match the expected shape
    #[error("unexpected row shape: {0}")]
    Corrupt(String),
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
