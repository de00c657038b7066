//! Error types for the basis-factorization engine.

use thiserror::Error;

/// Errors that can occur while maintaining a basis factorization.
#[derive(Error, Debug)]
pub enum FactorizationError {
    /// A backing buffer could not be acquired at construction
    #[error("Allocation failed: {0}")]
    AllocationFailed(&'static str),

    /// Partial pivoting found no usable pivot; the basis is numerically singular
    #[error("No pivot available in column {column}: basis is singular")]
    NoPivotAvailable {
        /// Column of U in which every candidate was within tolerance of zero
        column: usize,
    },

    /// Explicit inversion of the base matrix requires an empty eta chain
    #[error("Cannot invert the base matrix while eta updates are pending")]
    BasisUpdatesPending,
}

/// Result type for factorization operations.
pub type FactorizationResult<T> = Result<T, FactorizationError>;
