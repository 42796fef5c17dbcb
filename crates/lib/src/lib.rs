//!
//! propbag: an ordered, dynamically-typed property store.
//! This library provides an in-memory container that behaves like an ordered map from
//! string keys to heterogeneous values, with hooks for observing writes and rewriting reads.
//!
//! ## Core Concepts
//!
//! * **Stores (`store::Store`)**: A shared handle to an ordered set of unique keys and their values.
//!   Stores can be nested inside each other and addressed with dotted/bracketed paths.
//! * **Values (`store::Value`)**: The tagged value type: scalars, nested stores, plain maps and lists.
//! * **Listeners (`store::Listener`)**: Write hooks folded over every `set`, able to replace the stored value.
//! * **Filters (`store::Filter`)**: Read hooks folded over every `get`, able to replace the returned value
//!   without touching storage.
//! * **Clocks (`Clock`)**: A time source used for the store's time-based identifier.

pub mod clock;
pub mod store;

pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "testing"))]
pub use clock::FixedClock;
pub use store::{Filter, Listener, Locator, RegistrationId, Store, StoreError, Targets, Value};

/// Result type used throughout the propbag library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the propbag library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured store errors from the store module
    #[error(transparent)]
    Store(store::StoreError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Store(_) => "store",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error is validation-related.
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_validation_error(),
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }

    /// Check if this error is store-related.
    pub fn is_store_error(&self) -> bool {
        matches!(self, Error::Store(_))
    }
}
