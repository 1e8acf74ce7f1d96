//! Topic management
//!
//! A `Topic` holds the set of connection ids subscribed to one topic name.
//! Topics are created on first subscription and never removed; an emptied
//! topic is indistinguishable from one that was never subscribed to.
//!
//! Concurrency note: callers must synchronize access to `Topic`; the
//! subscription index keeps all topics behind its single lock.

use std::collections::HashSet;

use crate::registry::ConnectionId;

#[derive(Debug, Default)]
pub struct Topic {
    pub name: String,
    pub subscribers: HashSet<ConnectionId>,
}

impl Topic {
    /// Create a new topic with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            subscribers: HashSet::new(),
        }
    }

    /// Add a subscriber. Returns `false` if it was already subscribed.
    pub fn subscribe(&mut self, id: ConnectionId) -> bool {
        self.subscribers.insert(id)
    }

    /// Remove a subscriber. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: &str) -> bool {
        self.subscribers.remove(id)
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
