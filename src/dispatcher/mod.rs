//! Event dispatcher
//!
//! Validates a parsed transport event, applies it to the connection registry
//! and subscription index, and turns the result into a `Response`. The
//! dispatcher holds no per-call state; the only lifecycle is the
//! connection's, which lives in the registry.
//!
//! | event      | effect                                   | result                          |
//! |------------|------------------------------------------|---------------------------------|
//! | connect    | register                                 | 200 / 409 / 400                 |
//! | disconnect | unregister, remove from index            | always 200                      |
//! | subscribe  | index subscribe                          | 200 / 400                       |
//! | publish    | delivery engine fan-out                  | 200 with delivered count / 400  |

pub mod event;
pub mod response;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::broker::{DeliveryEngine, DeliveryReport, SubscriptionIndex, TransportSender};
use crate::registry::ConnectionRegistry;
use crate::utils::RelayError;

pub use event::{Event, EventKind, Payload};
pub use response::Response;

/// Successful result of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Connected,
    Disconnected,
    Subscribed { topic: String },
    Published(DeliveryReport),
}

impl Outcome {
    pub fn into_response(self) -> Response {
        match self {
            Outcome::Connected => Response::ok("Connected successfully"),
            Outcome::Disconnected => Response::ok("Disconnected successfully"),
            Outcome::Subscribed { topic } => Response::ok(format!("Subscribed to {topic}")),
            Outcome::Published(report) => Response::ok(format!(
                "Message sent to {} subscribers of {}",
                report.sent, report.topic
            )),
        }
    }
}

pub struct Dispatcher {
    registry: Arc<ConnectionRegistry>,
    index: Arc<SubscriptionIndex>,
    engine: DeliveryEngine,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        index: Arc<SubscriptionIndex>,
        engine: DeliveryEngine,
    ) -> Self {
        Self {
            registry,
            index,
            engine,
        }
    }

    /// Builds a fresh registry, index and delivery engine around `sender`.
    pub fn with_sender(sender: Arc<dyn TransportSender>, send_timeout: Duration) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let index = Arc::new(SubscriptionIndex::new(registry.clone()));
        let engine = DeliveryEngine::new(registry.clone(), index.clone(), sender, send_timeout);
        Self::new(registry, index, engine)
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub fn index(&self) -> &Arc<SubscriptionIndex> {
        &self.index
    }

    /// Handles one event and maps the result to a transport response.
    pub async fn dispatch(&self, event: Event) -> Response {
        debug!(kind = %event.kind, connection_id = %event.connection_id, "dispatching event");

        match self.handle(event).await {
            Ok(outcome) => outcome.into_response(),
            Err(err) => {
                warn!(error = %err, "event rejected");
                Response::from(&err)
            }
        }
    }

    pub async fn handle(&self, event: Event) -> Result<Outcome, RelayError> {
        let Event {
            kind,
            connection_id,
            api_key,
            payload,
        } = event;

        let kind = EventKind::from_route(&kind).ok_or(RelayError::UnknownEvent(kind))?;

        match kind {
            EventKind::Connect => {
                require_connection_id(&connection_id)?;
                let api_key = api_key
                    .filter(|key| !key.is_empty())
                    .ok_or_else(|| RelayError::Validation("missing api key".to_string()))?;

                self.registry.register(&connection_id, &api_key)?;
                info!(%connection_id, "client connected");
                Ok(Outcome::Connected)
            }
            EventKind::Disconnect => {
                self.registry.unregister(&connection_id);
                let topics = self.index.remove_connection(&connection_id);
                info!(%connection_id, topics = topics.len(), "client disconnected");
                Ok(Outcome::Disconnected)
            }
            EventKind::Subscribe => {
                require_connection_id(&connection_id)?;
                let payload = payload.unwrap_or_default();
                let topic = require_topic(payload.topic)?;

                self.index.subscribe(&topic, &connection_id)?;
                info!(%connection_id, %topic, "client subscribed");
                Ok(Outcome::Subscribed { topic })
            }
            EventKind::Publish => {
                let payload = payload.unwrap_or_default();
                let topic = require_topic(payload.topic)?;
                let message = payload
                    .message
                    .ok_or_else(|| RelayError::Validation("missing message".to_string()))?;

                let report = self.engine.publish(&topic, &message).await;
                info!(
                    %topic,
                    sent = report.sent,
                    stale = report.stale,
                    failed = report.failed(),
                    "message published"
                );
                Ok(Outcome::Published(report))
            }
        }
    }
}

fn require_connection_id(connection_id: &str) -> Result<(), RelayError> {
    if connection_id.is_empty() {
        return Err(RelayError::Validation("missing connection id".to_string()));
    }
    Ok(())
}

fn require_topic(topic: Option<String>) -> Result<String, RelayError> {
    match topic {
        Some(topic) if !topic.trim().is_empty() => Ok(topic),
        Some(_) => Err(RelayError::Validation("topic must not be empty".to_string())),
        None => Err(RelayError::Validation("missing topic".to_string())),
    }
}
