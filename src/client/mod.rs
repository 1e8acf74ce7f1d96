//! The `client` module defines the outbound side of a connected client.
//!
//! It provides the `Client` struct, which pairs a connection id with the
//! channel the transport drains into that client's socket.

pub mod pubsub_client;
pub use pubsub_client::Client;

#[cfg(test)]
mod tests;
