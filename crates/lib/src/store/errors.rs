//! Error types for store operations.
//!
//! Most store operations are total: unresolvable reads fall back to a default and
//! removing absent keys is a no-op. The variants here cover the two operations that
//! can be rejected, reordering and hook registration, plus use of a store after
//! it was destroyed.

use thiserror::Error;

/// Structured error types for store operations.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A position or key did not resolve to an existing entry
    #[error("Index does not exist: {index}")]
    IndexNotFound { index: String },

    /// A registration parameter had the wrong shape
    #[error("The {parameter} parameter supplied to {operation}() is invalid: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        operation: &'static str,
        reason: String,
    },

    /// The store was torn down with `destroy()`
    #[error("Store has been destroyed; {operation}() is unavailable")]
    Destroyed { operation: &'static str },
}

impl StoreError {
    /// Check if this error indicates an entry was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::IndexNotFound { .. })
    }

    /// Check if this error is a parameter validation failure
    pub fn is_validation_error(&self) -> bool {
        matches!(self, StoreError::InvalidParameter { .. })
    }

    /// Check if this error was caused by using a destroyed store
    pub fn is_destroyed(&self) -> bool {
        matches!(self, StoreError::Destroyed { .. })
    }

    /// Get the operation name if this error names one
    pub fn operation(&self) -> Option<&str> {
        match self {
            StoreError::InvalidParameter { operation, .. } | StoreError::Destroyed { operation } => {
                Some(operation)
            }
            _ => None,
        }
    }

    /// Get the offending parameter name if this is a validation error
    pub fn parameter(&self) -> Option<&str> {
        match self {
            StoreError::InvalidParameter { parameter, .. } => Some(parameter),
            _ => None,
        }
    }
}

// Conversion from StoreError to the main Error type
impl From<StoreError> for crate::Error {
    fn from(err: StoreError) -> Self {
        crate::Error::Store(err)
    }
}
