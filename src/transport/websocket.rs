//! WebSocket gateway
//!
//! Stands in for a managed WebSocket gateway in front of the relay core.
//! Responsibilities:
//! - Accept TCP/WebSocket connections and give each one a UUID connection id
//! - Read the `x-api-key` header from the upgrade request and dispatch a
//!   `$connect` event; a rejected connect is reported and the socket closed
//! - Route each text frame to the dispatcher and write its `Response` back
//! - Attach the connection's outbound channel to the `ChannelSender` so the
//!   delivery engine can reach it
//! - Dispatch `$disconnect` when the socket closes
//!
//! The API key is only carried through; it is not validated here.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::accept_hdr_async;
use tracing::{debug, info, warn};
use tungstenite::handshake::server::{ErrorResponse, Request, Response as HandshakeResponse};
use tungstenite::protocol::Message as WsMessage;
use uuid::Uuid;

use crate::client::Client;
use crate::config::Settings;
use crate::dispatcher::{Dispatcher, Event, Response};
use crate::transport::message::{ServerMessage, parse_frame};
use crate::transport::sender::ChannelSender;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Binds the configured address and serves until the process stops.
pub async fn start_websocket_server(settings: Settings) -> std::io::Result<()> {
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;

    info!("WebSocket relay listening on ws://{addr}");

    let sender = Arc::new(ChannelSender::new());
    let dispatcher = Arc::new(Dispatcher::with_sender(
        sender.clone(),
        Duration::from_millis(settings.relay.send_timeout_ms),
    ));

    serve(listener, dispatcher, sender, settings.relay.outbound_buffer).await;
    Ok(())
}

/// Accept loop over an already bound listener.
pub async fn serve(
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
    sender: Arc<ChannelSender>,
    outbound_buffer: usize,
) {
    loop {
        let stream = match listener.accept().await {
            Ok((stream, _)) => stream,
            Err(e) => {
                warn!("Failed to accept connection: {e}");
                continue;
            }
        };

        let dispatcher = dispatcher.clone();
        let sender = sender.clone();
        tokio::spawn(handle_connection(
            stream,
            dispatcher,
            sender,
            outbound_buffer,
        ));
    }
}

async fn handle_connection(
    stream: TcpStream,
    dispatcher: Arc<Dispatcher>,
    sender: Arc<ChannelSender>,
    outbound_buffer: usize,
) {
    let mut api_key = None;
    let capture_api_key = |request: &Request,
                           response: HandshakeResponse|
     -> Result<HandshakeResponse, ErrorResponse> {
        api_key = request
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        Ok(response)
    };

    let ws_stream = match accept_hdr_async(stream, capture_api_key).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake error: {e}");
            return;
        }
    };

    let connection_id = Uuid::new_v4().to_string();
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (tx, mut rx) = mpsc::channel::<WsMessage>(outbound_buffer.max(1));
    sender.attach(Client::new(connection_id.clone(), tx.clone()));

    let send_loop = {
        let connection_id = connection_id.clone();
        tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                if let Err(e) = ws_sender.send(msg).await {
                    debug!("Failed to send message to {connection_id}: {e}");
                    break;
                }
            }
            debug!("Send loop closed for {connection_id}");
        })
    };

    let connected = dispatcher
        .dispatch(Event {
            kind: "$connect".to_string(),
            connection_id: connection_id.clone(),
            api_key,
            payload: None,
        })
        .await;
    reply(&tx, &connected).await;

    if connected.is_success() {
        while let Some(frame) = ws_receiver.next().await {
            match frame {
                Ok(WsMessage::Text(text)) => {
                    let event = parse_frame(text.as_str(), &connection_id);
                    let response = dispatcher.dispatch(event).await;
                    reply(&tx, &response).await;
                }
                Ok(WsMessage::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    debug!("Read error on {connection_id}: {e}");
                    break;
                }
            }
        }

        dispatcher.dispatch(Event::disconnect(&connection_id)).await;
    } else {
        let _ = tx.send(WsMessage::Close(None)).await;
    }

    sender.detach(&connection_id);
    debug!(
        "{connection_id} detached, {} connections attached",
        sender.attached_count()
    );
    drop(tx);
    let _ = send_loop.await;
    info!("{connection_id} closed");
}

async fn reply(tx: &mpsc::Sender<WsMessage>, response: &Response) {
    match serde_json::to_string(&ServerMessage::from(response)) {
        Ok(json) => {
            let _ = tx.send(WsMessage::text(json)).await;
        }
        Err(e) => warn!("Failed to serialize response: {e}"),
    }
}
