//! Connection Registry
//!
//! Maps a transport connection id to the client metadata captured on
//! `connect` (API key, connect time). It is the leaf component of the relay:
//! the subscription index consults it to reject subscriptions for unknown
//! connections, and nothing else in here depends on other modules.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};

use crate::utils::RelayError;

pub type ConnectionId = String;

/// Metadata recorded for a connected client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub connection_id: ConnectionId,
    pub api_key: String,
    pub connected_at: DateTime<Utc>,
}

/// Thread-safe registry of active connections.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, ClientInfo>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new connection.
    ///
    /// Fails with `DuplicateConnection` if the id is already registered; the
    /// existing record is left untouched.
    pub fn register(&self, connection_id: &str, api_key: &str) -> Result<(), RelayError> {
        let mut connections = self
            .connections
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if connections.contains_key(connection_id) {
            return Err(RelayError::DuplicateConnection(connection_id.to_string()));
        }

        connections.insert(
            connection_id.to_string(),
            ClientInfo {
                connection_id: connection_id.to_string(),
                api_key: api_key.to_string(),
                connected_at: Utc::now(),
            },
        );
        Ok(())
    }

    /// Removes a connection, returning its record. Unknown ids yield `None`.
    pub fn unregister(&self, connection_id: &str) -> Option<ClientInfo> {
        self.connections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(connection_id)
    }

    pub fn lookup(&self, connection_id: &str) -> Option<ClientInfo> {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(connection_id)
            .cloned()
    }

    pub fn contains(&self, connection_id: &str) -> bool {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(connection_id)
    }

    /// Number of currently registered connections.
    pub fn len(&self) -> usize {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests;
