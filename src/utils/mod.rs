//! The `utils` module provides a collection of utility functions and common
//! definitions used across the `wsrelay` application.
//!
//! It centralizes the error taxonomy shared by the registry, index and
//! dispatcher, and the tracing setup used by the binary.

pub mod error;
pub mod logging;

pub use error::RelayError;
