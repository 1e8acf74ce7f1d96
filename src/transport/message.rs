//! Wire frames exchanged with WebSocket clients.
//!
//! Inbound frames carry an `action` that selects the route, mirroring a
//! gateway's `$request.body.action` route selection. Only `subscribe` and
//! `publish` are routable from a frame; connect and disconnect come from
//! the socket itself.

use serde::{Deserialize, Serialize};

use crate::broker::Message;
use crate::dispatcher::{Event, Payload, Response};

/// Route used for frames that cannot be routed.
pub const DEFAULT_ROUTE: &str = "$default";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ClientMessage {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "response", rename_all = "camelCase")]
    Response { status_code: u16, body: String },
    #[serde(rename = "message")]
    Message {
        topic: String,
        payload: String,
        timestamp: i64,
    },
}

impl From<&Response> for ServerMessage {
    fn from(response: &Response) -> Self {
        ServerMessage::Response {
            status_code: response.status_code,
            body: response.body.clone(),
        }
    }
}

impl From<&Message> for ServerMessage {
    fn from(message: &Message) -> Self {
        ServerMessage::Message {
            topic: message.topic.clone(),
            payload: message.payload.clone(),
            timestamp: message.timestamp,
        }
    }
}

/// Builds the dispatcher event for one text frame from `connection_id`.
///
/// Unparseable frames, frames without an `action`, and actions that are not
/// routable from a frame all map to `$default`.
pub fn parse_frame(text: &str, connection_id: &str) -> Event {
    let (kind, payload) = match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage {
            action: Some(action),
            topic,
            message,
        }) if action == "subscribe" || action == "publish" => {
            (action, Some(Payload { topic, message }))
        }
        _ => (DEFAULT_ROUTE.to_string(), None),
    };

    Event {
        kind,
        connection_id: connection_id.to_string(),
        api_key: None,
        payload,
    }
}
