use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tungstenite::client::IntoClientRequest;
use tungstenite::http::HeaderValue;
use tungstenite::protocol::Message as WsMessage;

use crate::dispatcher::Dispatcher;
use crate::transport::message::ServerMessage;
use crate::transport::sender::ChannelSender;
use crate::transport::websocket::{API_KEY_HEADER, serve};

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_relay() -> (String, Arc<Dispatcher>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();

    let sender = Arc::new(ChannelSender::new());
    let dispatcher = Arc::new(Dispatcher::with_sender(
        sender.clone(),
        Duration::from_secs(1),
    ));
    tokio::spawn(serve(listener, dispatcher.clone(), sender, 16));

    (format!("ws://{addr}"), dispatcher)
}

async fn connect(url: &str, api_key: Option<&str>) -> Ws {
    let mut request = url.into_client_request().unwrap();
    if let Some(key) = api_key {
        request
            .headers_mut()
            .insert(API_KEY_HEADER, HeaderValue::from_str(key).unwrap());
    }
    let (ws, _) = connect_async(request)
        .await
        .expect("WebSocket handshake failed");
    ws
}

async fn next_server_message(ws: &mut Ws) -> ServerMessage {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("Timed out waiting for a frame")
            .expect("Stream ended")
            .expect("Read error");
        if let WsMessage::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap_or_else(|e| {
                panic!(
                    "Failed to deserialize ServerMessage from '{}': {e}",
                    text.as_str()
                )
            });
        }
    }
}

async fn send_json(ws: &mut Ws, value: serde_json::Value) {
    ws.send(WsMessage::text(value.to_string()))
        .await
        .expect("Failed to send frame");
}

fn response(status_code: u16, body: &str) -> ServerMessage {
    ServerMessage::Response {
        status_code,
        body: body.to_string(),
    }
}

async fn wait_until(mut check: impl FnMut() -> bool) {
    for _ in 0..100 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn test_subscribe_and_publish_over_websocket() {
    let (url, dispatcher) = start_relay().await;

    let mut publisher = connect(&url, Some("key-a")).await;
    assert_eq!(
        next_server_message(&mut publisher).await,
        response(200, "Connected successfully")
    );
    let mut subscriber = connect(&url, Some("key-b")).await;
    assert_eq!(
        next_server_message(&mut subscriber).await,
        response(200, "Connected successfully")
    );
    assert_eq!(dispatcher.registry().len(), 2);

    send_json(
        &mut subscriber,
        json!({ "action": "subscribe", "topic": "weather" }),
    )
    .await;
    assert_eq!(
        next_server_message(&mut subscriber).await,
        response(200, "Subscribed to weather")
    );

    send_json(
        &mut publisher,
        json!({ "action": "publish", "topic": "weather", "message": "rain" }),
    )
    .await;
    assert_eq!(
        next_server_message(&mut publisher).await,
        response(200, "Message sent to 1 subscribers of weather")
    );

    match next_server_message(&mut subscriber).await {
        ServerMessage::Message { topic, payload, .. } => {
            assert_eq!(topic, "weather");
            assert_eq!(payload, "rain");
        }
        other => panic!("Expected a delivered message, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connect_without_api_key_is_rejected() {
    let (url, dispatcher) = start_relay().await;

    let mut ws = connect(&url, None).await;
    match next_server_message(&mut ws).await {
        ServerMessage::Response { status_code, .. } => assert_eq!(status_code, 400),
        other => panic!("Expected a response, got {other:?}"),
    }

    // the relay closes the socket after a rejected connect
    let closed = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(Ok(frame)) = ws.next().await {
            if frame.is_close() {
                return;
            }
        }
    })
    .await;
    assert!(closed.is_ok());
    assert!(dispatcher.registry().is_empty());
}

#[tokio::test]
async fn test_socket_close_disconnects_and_unsubscribes() {
    let (url, dispatcher) = start_relay().await;

    let mut publisher = connect(&url, Some("key-a")).await;
    next_server_message(&mut publisher).await;
    let mut subscriber = connect(&url, Some("key-b")).await;
    next_server_message(&mut subscriber).await;

    send_json(&mut subscriber, json!({ "action": "subscribe", "topic": "t" })).await;
    next_server_message(&mut subscriber).await;
    assert_eq!(dispatcher.index().resolve_subscribers("t").len(), 1);

    subscriber.close(None).await.expect("Failed to close WebSocket");
    wait_until(|| dispatcher.registry().len() == 1).await;
    assert!(dispatcher.index().resolve_subscribers("t").is_empty());

    send_json(
        &mut publisher,
        json!({ "action": "publish", "topic": "t", "message": "x" }),
    )
    .await;
    assert_eq!(
        next_server_message(&mut publisher).await,
        response(200, "Message sent to 0 subscribers of t")
    );
}

#[tokio::test]
async fn test_unroutable_frame_gets_invalid_route() {
    let (url, _dispatcher) = start_relay().await;

    let mut ws = connect(&url, Some("key")).await;
    next_server_message(&mut ws).await;

    ws.send(WsMessage::text("definitely not json".to_string()))
        .await
        .expect("Failed to send frame");
    assert_eq!(
        next_server_message(&mut ws).await,
        response(400, "Invalid route")
    );

    send_json(&mut ws, json!({ "action": "subscribe" })).await;
    match next_server_message(&mut ws).await {
        ServerMessage::Response { status_code, .. } => assert_eq!(status_code, 400),
        other => panic!("Expected a response, got {other:?}"),
    }
}
