//! Channel-backed transport sender.
//!
//! Each attached connection owns a bounded channel drained by its socket's
//! send loop. A connection that is not attached, or whose send loop has
//! exited, is reported as stale. A full channel makes the send wait; the
//! delivery engine's timeout bounds that wait.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use tungstenite::protocol::Message as WsMessage;

use crate::broker::{Message, SendOutcome, TransportSender};
use crate::client::Client;
use crate::transport::message::ServerMessage;

#[derive(Debug, Default)]
pub struct ChannelSender {
    clients: RwLock<HashMap<String, Client>>,
}

impl ChannelSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a client, replacing any previous handle with the same id.
    pub fn attach(&self, client: Client) {
        self.clients
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(client.id.clone(), client);
    }

    pub fn detach(&self, connection_id: &str) -> Option<Client> {
        self.clients
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(connection_id)
    }

    pub fn attached_count(&self) -> usize {
        self.clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn lookup(&self, connection_id: &str) -> Option<Client> {
        self.clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(connection_id)
            .cloned()
    }
}

#[async_trait]
impl TransportSender for ChannelSender {
    async fn send(&self, connection_id: &str, message: &Message) -> SendOutcome {
        let client = match self.lookup(connection_id) {
            Some(client) if !client.is_closed() => client,
            _ => return SendOutcome::StaleConnection,
        };

        let frame = match serde_json::to_string(&ServerMessage::from(message)) {
            Ok(json) => json,
            Err(e) => return SendOutcome::Failed(format!("failed to serialize message: {e}")),
        };

        match client.sender.send(WsMessage::text(frame)).await {
            Ok(()) => SendOutcome::Sent,
            Err(_) => SendOutcome::StaleConnection,
        }
    }
}
