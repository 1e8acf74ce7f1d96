//! Delivery engine
//!
//! Fans one published message out to every current subscriber of a topic.
//!
//! - Subscribers are resolved as a snapshot; no index lock is held while
//!   sending.
//! - Attempts run concurrently and each one is bounded by `send_timeout`. A
//!   timed out attempt is `Failed` and is not retried here.
//! - A `StaleConnection` outcome prunes that connection from the registry and
//!   the index as soon as it is observed, so a publish that is cancelled part
//!   way keeps the prunes it already applied.
//! - Individual failures never fail the publish; they are counted in the
//!   returned `DeliveryReport`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info, warn};

use crate::broker::index::SubscriptionIndex;
use crate::broker::message::Message;
use crate::registry::{ConnectionId, ConnectionRegistry};

/// Result of one send to one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    /// The transport reports the peer is gone.
    StaleConnection,
    Failed(String),
}

/// Capability to push a message to a connection.
///
/// Implementations must be safe to call concurrently for distinct connection
/// ids. Any retry policy belongs to the implementation.
#[async_trait]
pub trait TransportSender: Send + Sync {
    async fn send(&self, connection_id: &str, message: &Message) -> SendOutcome;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub connection_id: ConnectionId,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub topic: String,
    pub sent: usize,
    pub stale: usize,
    pub failures: Vec<DeliveryFailure>,
    /// Connections removed from the registry and index during this publish.
    pub pruned: Vec<ConnectionId>,
}

impl DeliveryReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn attempted(&self) -> usize {
        self.sent + self.stale + self.failed()
    }
}

pub struct DeliveryEngine {
    registry: Arc<ConnectionRegistry>,
    index: Arc<SubscriptionIndex>,
    sender: Arc<dyn TransportSender>,
    send_timeout: Duration,
}

impl DeliveryEngine {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        index: Arc<SubscriptionIndex>,
        sender: Arc<dyn TransportSender>,
        send_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            index,
            sender,
            send_timeout,
        }
    }

    /// Publishes `payload` to every current subscriber of `topic`.
    ///
    /// A topic with no subscribers (or one never subscribed to) yields an
    /// empty report, not an error.
    pub async fn publish(&self, topic: &str, payload: &str) -> DeliveryReport {
        let subscribers = self.index.resolve_subscribers(topic);
        let mut report = DeliveryReport {
            topic: topic.to_string(),
            ..Default::default()
        };

        if subscribers.is_empty() {
            debug!(topic, "publish to topic without subscribers");
            return report;
        }

        let message = Message::new(topic, payload);
        let message = &message;
        let mut attempts: FuturesUnordered<_> = subscribers
            .into_iter()
            .map(move |connection_id| async move {
                let outcome = self.attempt(&connection_id, message).await;
                (connection_id, outcome)
            })
            .collect();

        while let Some((connection_id, outcome)) = attempts.next().await {
            match outcome {
                SendOutcome::Sent => {
                    debug!(topic, %connection_id, "delivered");
                    report.sent += 1;
                }
                SendOutcome::StaleConnection => {
                    self.prune(&connection_id);
                    report.stale += 1;
                    report.pruned.push(connection_id);
                }
                SendOutcome::Failed(reason) => {
                    warn!(topic, %connection_id, %reason, "delivery failed");
                    report.failures.push(DeliveryFailure {
                        connection_id,
                        reason,
                    });
                }
            }
        }

        report
    }

    async fn attempt(&self, connection_id: &str, message: &Message) -> SendOutcome {
        match tokio::time::timeout(self.send_timeout, self.sender.send(connection_id, message))
            .await
        {
            Ok(outcome) => outcome,
            Err(_) => SendOutcome::Failed(format!(
                "send timed out after {}ms",
                self.send_timeout.as_millis()
            )),
        }
    }

    fn prune(&self, connection_id: &str) {
        self.registry.unregister(connection_id);
        let topics = self.index.remove_connection(connection_id);
        info!(
            connection_id,
            topics = topics.len(),
            "pruned stale connection"
        );
    }
}
