use tokio::sync::mpsc::Sender;
use tungstenite::protocol::Message as WsMessage;

/// Outbound handle for one connected client.
///
/// The `sender` feeds the task that writes to the client's socket; once that
/// task exits, sends fail and the client is treated as gone.
#[derive(Debug, Clone)]
pub struct Client {
    /// Connection id assigned by the transport.
    pub id: String,

    /// Channel to send WebSocket messages to the client.
    pub sender: Sender<WsMessage>,
}

impl Client {
    pub fn new(id: impl Into<String>, sender: Sender<WsMessage>) -> Self {
        Self {
            id: id.into(),
            sender,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
