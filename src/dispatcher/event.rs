use serde::{Deserialize, Serialize};

/// Route an event is dispatched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Connect,
    Disconnect,
    Subscribe,
    Publish,
}

impl EventKind {
    /// Accepts both bare names and the gateway route keys (`$connect`,
    /// `$disconnect`). Anything else, `$default` included, has no route.
    pub fn from_route(route: &str) -> Option<Self> {
        match route {
            "connect" | "$connect" => Some(EventKind::Connect),
            "disconnect" | "$disconnect" => Some(EventKind::Disconnect),
            "subscribe" => Some(EventKind::Subscribe),
            "publish" => Some(EventKind::Publish),
            _ => None,
        }
    }
}

/// Body fields carried by `subscribe` and `publish`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A parsed event as handed over by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub kind: String,
    pub connection_id: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub payload: Option<Payload>,
}

impl Event {
    pub fn connect(connection_id: &str, api_key: &str) -> Self {
        Self {
            kind: "connect".to_string(),
            connection_id: connection_id.to_string(),
            api_key: Some(api_key.to_string()),
            payload: None,
        }
    }

    pub fn disconnect(connection_id: &str) -> Self {
        Self {
            kind: "disconnect".to_string(),
            connection_id: connection_id.to_string(),
            api_key: None,
            payload: None,
        }
    }

    pub fn subscribe(connection_id: &str, topic: &str) -> Self {
        Self {
            kind: "subscribe".to_string(),
            connection_id: connection_id.to_string(),
            api_key: None,
            payload: Some(Payload {
                topic: Some(topic.to_string()),
                message: None,
            }),
        }
    }

    pub fn publish(connection_id: &str, topic: &str, message: &str) -> Self {
        Self {
            kind: "publish".to_string(),
            connection_id: connection_id.to_string(),
            api_key: None,
            payload: Some(Payload {
                topic: Some(topic.to_string()),
                message: Some(message.to_string()),
            }),
        }
    }
}
