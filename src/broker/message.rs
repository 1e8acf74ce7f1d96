//! Message definitions for the broker
//!
//! `Message` is the value handed to the transport sender for every delivery
//! attempt of one publish. Every subscriber of that publish receives the same
//! value.
//!
//! Notes on fields:
//! - `topic`: topic name the message was published to
//! - `payload`: the message body exactly as the publisher sent it
//! - `timestamp`: milliseconds since UNIX epoch; set by the broker on publish

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub topic: String,
    pub payload: String,
    pub timestamp: i64,
}

impl Message {
    pub fn new(topic: &str, payload: &str) -> Self {
        Self {
            topic: topic.to_string(),
            payload: payload.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}
