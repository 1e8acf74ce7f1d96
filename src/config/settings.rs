use serde::Deserialize;

/// Top-level configuration settings for the application.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server: ServerSettings,
    pub relay: RelaySettings,
    pub logging: LoggingSettings,
}

/// Address the WebSocket gateway binds to.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Delivery tuning.
///
/// `send_timeout_ms` bounds each send attempt of a publish;
/// `outbound_buffer` is the per-connection outbound channel capacity.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RelaySettings {
    pub send_timeout_ms: u64,
    pub outbound_buffer: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Missing values are filled from `Settings::default()`.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub relay: Option<PartialRelaySettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct PartialRelaySettings {
    pub send_timeout_ms: Option<u64>,
    pub outbound_buffer: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            relay: RelaySettings {
                send_timeout_ms: 5000,
                outbound_buffer: 64,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl PartialSettings {
    /// Merge with defaults, preferring any value that was provided.
    pub fn merge(self, default: Settings) -> Settings {
        let server = self.server;
        let relay = self.relay;
        let logging = self.logging;

        Settings {
            server: ServerSettings {
                host: server
                    .as_ref()
                    .and_then(|s| s.host.clone())
                    .unwrap_or(default.server.host),
                port: server
                    .as_ref()
                    .and_then(|s| s.port)
                    .unwrap_or(default.server.port),
            },
            relay: RelaySettings {
                send_timeout_ms: relay
                    .as_ref()
                    .and_then(|r| r.send_timeout_ms)
                    .unwrap_or(default.relay.send_timeout_ms),
                outbound_buffer: relay
                    .as_ref()
                    .and_then(|r| r.outbound_buffer)
                    .unwrap_or(default.relay.outbound_buffer),
            },
            logging: LoggingSettings {
                level: logging
                    .and_then(|l| l.level)
                    .unwrap_or(default.logging.level),
            },
        }
    }
}
