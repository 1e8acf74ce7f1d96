use super::pubsub_client::Client;
use tokio::sync::mpsc;
use tungstenite::protocol::Message as WsMessage;

#[test]
fn test_client_new() {
    let (tx, _rx) = mpsc::channel::<WsMessage>(1);
    let client = Client::new("conn1", tx);
    assert_eq!(client.id, "conn1");
    assert!(!client.is_closed());
}

#[test]
fn test_client_closed_after_receiver_dropped() {
    let (tx, rx) = mpsc::channel::<WsMessage>(1);
    let client = Client::new("conn1", tx);
    drop(rx);
    assert!(client.is_closed());
}
