//! The `transport` module is the boundary between sockets and the relay core.
//!
//! It defines the JSON frames exchanged with WebSocket clients, a
//! channel-backed `TransportSender` for the delivery engine, and the
//! WebSocket gateway that turns socket activity into dispatcher events.

pub mod message;
pub mod sender;
pub mod websocket;

pub use message::{ClientMessage, ServerMessage, parse_frame};
pub use sender::ChannelSender;
pub use websocket::{serve, start_websocket_server};

#[cfg(test)]
mod websocket_tests;
