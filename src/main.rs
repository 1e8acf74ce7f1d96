//! CLI for wsrelay
//!
//! Subcommands:
//! - `server`: run the WebSocket relay
//! - `client`: run a simple client (useful for smoke tests)

use clap::Parser;
use tracing::{error, info};
use wsrelay::config::load_config;
use wsrelay::transport::start_websocket_server;

#[derive(Parser)]
#[command(name = "wsrelay")]
enum Command {
    /// Start the WebSocket relay
    Server,
    /// Connect, subscribe to a topic, publish to it and print what comes back
    Client {
        /// WebSocket server URL to connect to
        #[arg(long, default_value = "ws://127.0.0.1:8080")]
        url: String,
        /// Value sent in the x-api-key header
        #[arg(long, default_value = "demo-key")]
        api_key: String,
        #[arg(long, default_value = "chat")]
        topic: String,
        #[arg(long, default_value = "Hello from wsrelay")]
        message: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cmd = Command::parse();

    match cmd {
        Command::Server => {
            if let Err(e) = run_server().await {
                error!("Server failed: {}", e);
            }
        }
        Command::Client {
            url,
            api_key,
            topic,
            message,
        } => {
            wsrelay::utils::logging::init("info");
            if let Err(e) = run_client(&url, &api_key, &topic, &message).await {
                error!("Client failed: {}", e);
            }
        }
    }
}

async fn run_server() -> Result<(), Box<dyn std::error::Error>> {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            wsrelay::utils::logging::init("info");
            return Err(e.into());
        }
    };
    wsrelay::utils::logging::init(&config.logging.level);

    tokio::select! {
        res = start_websocket_server(config) => {
            res?;
            error!("WebSocket server exited unexpectedly.");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }

    Ok(())
}

async fn run_client(
    url: &str,
    api_key: &str,
    topic: &str,
    message: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    use futures_util::{SinkExt, StreamExt};
    use serde_json::json;
    use tokio_tungstenite::connect_async;
    use tokio_tungstenite::tungstenite::Message as WsMessage;
    use tokio_tungstenite::tungstenite::client::IntoClientRequest;
    use tokio_tungstenite::tungstenite::http::HeaderValue;

    let mut request = url.into_client_request()?;
    request.headers_mut().insert(
        wsrelay::transport::websocket::API_KEY_HEADER,
        HeaderValue::from_str(api_key)?,
    );
    let (mut ws_stream, _response) = connect_async(request).await?;

    // 1. Connect response
    if let Some(Ok(WsMessage::Text(msg))) = ws_stream.next().await {
        println!("Connect response: {msg}");
    }

    // 2. Subscribe
    let subscribe = json!({ "action": "subscribe", "topic": topic });
    ws_stream
        .send(WsMessage::Text(subscribe.to_string().into()))
        .await?;

    // 3. Publish to the same topic so we receive our own message
    let publish = json!({ "action": "publish", "topic": topic, "message": message });
    ws_stream
        .send(WsMessage::Text(publish.to_string().into()))
        .await?;

    // subscribe response, delivery and publish response, in some order
    for _ in 0..3 {
        match tokio::time::timeout(std::time::Duration::from_secs(5), ws_stream.next()).await {
            Ok(Some(Ok(WsMessage::Text(incoming)))) => println!("Incoming: {incoming}"),
            Ok(Some(Ok(_))) => {}
            _ => break,
        }
    }

    ws_stream.close(None).await?;
    Ok(())
}
