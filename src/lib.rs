//! # wsrelay
//!
//! `wsrelay` is an in-memory topic relay for WebSocket clients. Connections
//! subscribe to named topics; a message published to a topic is fanned out to
//! every connection currently subscribed to it.
//!
//! ## Core Modules
//!
//! - `registry`: which connections exist and the API key each connected with.
//! - `broker`: the topic/connection subscription index and the delivery engine.
//! - `dispatcher`: validates transport events and applies them to the core.
//! - `transport`: the WebSocket gateway and the channel-backed sender.
//! - `client`: the outbound handle of one connected client.
//! - `config`: settings loading.
//! - `utils`: error types and logging setup.
//!
//! The registry, index, delivery engine and dispatcher are plain values wired
//! together with `Arc`; separate instances never share state.

pub mod broker;
pub mod client;
pub mod config;
pub mod dispatcher;
pub mod registry;
pub mod transport;
pub mod utils;
