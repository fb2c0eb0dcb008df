//! Ports and Adapters Infrastructure
//!
//! Each domain defines its own port trait over the document store the
//! presentation layer wires in; adapters implement those traits. This module
//! holds the pieces every port shares: the unified error type, the marker
//! trait, and the subscription guard returned by real-time watch operations.
//!
//! Error-handling contract (mirrored by every adapter):
//! - single-entity lookups return `Ok(None)` for absence, never `NotFound`;
//! - list operations may fail, but read-path callers degrade failures to
//!   empty defaults and log them;
//! - writes propagate failures to the caller, including
//!   `ConcurrentModification` when a versioned compare-and-swap loses.

use std::fmt;
use thiserror::Error;

/// Error type for port operations
///
/// Provides a unified error type that all port implementations must use,
/// ensuring consistent error handling across adapters.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// A validation error occurred
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// A versioned write lost to a concurrent writer
    #[error("Concurrent modification of {entity_type} {id}: expected version {expected}, found {actual}")]
    ConcurrentModification {
        entity_type: String,
        id: String,
        expected: u64,
        actual: u64,
    },

    /// Connection to the underlying store failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
        }
    }

    /// Creates a ConcurrentModification error
    pub fn concurrent_modification(
        entity_type: impl Into<String>,
        id: impl fmt::Display,
        expected: u64,
        actual: u64,
    ) -> Self {
        PortError::ConcurrentModification {
            entity_type: entity_type.into(),
            id: id.to_string(),
            expected,
            actual,
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. } | PortError::ConcurrentModification { .. }
        )
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Marker trait for all domain ports
///
/// All port traits should extend this marker to ensure they are
/// thread-safe and can be used in async contexts.
pub trait DomainPort: Send + Sync + 'static {}

/// Guard for an active real-time subscription
///
/// Dropping the guard unsubscribes. Calling [`Subscription::unsubscribe`]
/// more than once is inert.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wraps a cancellation closure
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription that was never registered; unsubscribing does nothing
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Cancels the subscription; safe to call repeatedly
    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
