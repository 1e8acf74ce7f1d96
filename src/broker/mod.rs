//! The `broker` module holds the topic side of the relay: the subscription
//! index that maps topics to connections (and back), and the delivery engine
//! that fans a published message out to every current subscriber.

pub mod delivery;
pub mod index;
pub mod message;
pub mod topic;

pub use delivery::{DeliveryEngine, DeliveryFailure, DeliveryReport, SendOutcome, TransportSender};
pub use index::SubscriptionIndex;
pub use message::Message;
