//! Error types for the event registry
//!
//! This module defines the error types for the event registry with clear
//! error messages and context. All errors use the `thiserror` crate for
//! ergonomic error handling.
//!
//! The registry deliberately favors silent, well-defined degenerate results
//! over raised errors: firing or querying an unknown event name is a normal
//! case and never fails. The only error sources are malformed registration
//! calls and poisoned registry locks.

use thiserror::Error;

/// Errors that can occur in the event registry
///
/// Each variant includes context about what went wrong and how to recover.
#[derive(Debug, Error)]
pub enum EventryError {
    /// Invalid event name at registration
    ///
    /// This error occurs when a handler is registered against an empty
    /// event name. The string contains the rejected name.
    /// Querying, firing, unbinding, or resetting any name never produces
    /// this error; only the registration entry points validate.
    #[error("Invalid event name: {0:?}")]
    InvalidName(String),

    /// Storage or registry error
    ///
    /// This error occurs when the registry lock is poisoned by a panic in
    /// another thread while it held the lock. The string contains details
    /// about which lock acquisition failed.
    /// Handler callbacks run with no lock held, so a panicking handler
    /// cannot produce this error.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for event registry operations
///
/// This is the standard result type used throughout the crate.
/// All public APIs return `Result<T>` where `T` is the success type.
pub type Result<T> = std::result::Result<T, EventryError>;
