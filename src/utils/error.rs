//! The `error` module defines the error types surfaced by relay operations.
//!
//! Every event handler returns a structured result; none of these errors is
//! fatal to the process. Per-subscriber delivery outcomes are not errors and
//! live in `broker::delivery::SendOutcome` instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// Malformed or missing input fields. Always a client-input problem.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A `connect` for an id that is already registered.
    #[error("connection {0} is already registered")]
    DuplicateConnection(String),

    /// The operation references a connection the registry does not know.
    #[error("connection {0} is not registered")]
    UnknownConnection(String),

    /// The event kind does not match any route.
    #[error("unrecognized event kind '{0}'")]
    UnknownEvent(String),
}

impl RelayError {
    /// Status code reported back to the transport for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            RelayError::Validation(_) => 400,
            RelayError::DuplicateConnection(_) => 409,
            RelayError::UnknownConnection(_) => 400,
            RelayError::UnknownEvent(_) => 400,
        }
    }
}
