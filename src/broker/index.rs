//! Subscription index
//!
//! The index keeps two maps in step:
//! - forward: topic name -> `Topic` (its subscriber set)
//! - reverse: connection id -> names of the topics it is subscribed to
//!
//! A connection appears in a topic's subscriber set if and only if that topic
//! appears in the connection's reverse entry. Both maps live behind a single
//! `RwLock`, so `remove_connection` is observed by `resolve_subscribers` either
//! completely or not at all.
//!
//! Lock order: the index lock is taken before the registry lock (in
//! `subscribe`). Nothing takes them in the opposite order.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::broker::topic::Topic;
use crate::registry::{ConnectionId, ConnectionRegistry};
use crate::utils::RelayError;

#[derive(Debug, Default)]
struct IndexState {
    topics: HashMap<String, Topic>,
    by_connection: HashMap<ConnectionId, HashSet<String>>,
}

#[derive(Debug)]
pub struct SubscriptionIndex {
    registry: Arc<ConnectionRegistry>,
    state: RwLock<IndexState>,
}

impl SubscriptionIndex {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            registry,
            state: RwLock::new(IndexState::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribes a connection to a topic, creating the topic if needed.
    ///
    /// The registry check happens under the index write lock, so a concurrent
    /// disconnect either runs entirely before (and this fails with
    /// `UnknownConnection`) or its `remove_connection` runs after and sees the
    /// new subscription.
    pub fn subscribe(&self, topic: &str, connection_id: &str) -> Result<(), RelayError> {
        let mut state = self.write();

        if !self.registry.contains(connection_id) {
            return Err(RelayError::UnknownConnection(connection_id.to_string()));
        }

        let added = state
            .topics
            .entry(topic.to_string())
            .or_insert_with(|| Topic::new(topic))
            .subscribe(connection_id.to_string());

        if added {
            state
                .by_connection
                .entry(connection_id.to_string())
                .or_default()
                .insert(topic.to_string());
        }

        Ok(())
    }

    /// Removes one subscription. No-op if it does not exist.
    pub fn unsubscribe(&self, topic: &str, connection_id: &str) {
        let mut state = self.write();

        let removed = state
            .topics
            .get_mut(topic)
            .is_some_and(|t| t.unsubscribe(connection_id));
        if !removed {
            return;
        }

        if let Some(topics) = state.by_connection.get_mut(connection_id) {
            topics.remove(topic);
            if topics.is_empty() {
                state.by_connection.remove(connection_id);
            }
        }
    }

    /// Removes a connection from every topic it is subscribed to and clears
    /// its reverse entry. Returns the topics it was removed from.
    pub fn remove_connection(&self, connection_id: &str) -> Vec<String> {
        let mut state = self.write();

        let Some(topics) = state.by_connection.remove(connection_id) else {
            return Vec::new();
        };

        let mut emptied = 0;
        for name in &topics {
            if let Some(topic) = state.topics.get_mut(name) {
                topic.unsubscribe(connection_id);
                if topic.is_empty() {
                    emptied += 1;
                }
            }
        }

        debug!(
            connection_id,
            topics = topics.len(),
            emptied,
            "removed connection from index"
        );
        topics.into_iter().collect()
    }

    /// Snapshot of a topic's current subscribers. Unknown and emptied topics
    /// both yield an empty set.
    pub fn resolve_subscribers(&self, topic: &str) -> HashSet<ConnectionId> {
        self.read()
            .topics
            .get(topic)
            .map(|t| t.subscribers.clone())
            .unwrap_or_default()
    }

    /// Snapshot of the topics a connection is subscribed to.
    pub fn topics_of(&self, connection_id: &str) -> HashSet<String> {
        self.read()
            .by_connection
            .get(connection_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of topics ever subscribed to, including emptied ones.
    pub fn topic_count(&self) -> usize {
        self.read().topics.len()
    }

    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let state = self.read();

        let forward_ok = state.topics.values().all(|topic| {
            topic.subscribers.iter().all(|conn| {
                state
                    .by_connection
                    .get(conn)
                    .is_some_and(|topics| topics.contains(&topic.name))
            })
        });

        let reverse_ok = state.by_connection.iter().all(|(conn, topics)| {
            !topics.is_empty()
                && topics.iter().all(|name| {
                    state
                        .topics
                        .get(name)
                        .is_some_and(|t| t.subscribers.contains(conn))
                })
        });

        forward_ok && reverse_ok
    }
}
