use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// REST base, e.g. `"http://127.0.0.1:8000"` (no trailing slash).
    pub base_url: String,
    /// WebSocket endpoint. Derived from `base_url` (`http` → `ws`, path
    /// `/ws`) when absent.
    #[serde(default)]
    pub ws_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RealtimeSection {
    /// Seconds between `"ping"` keep-alive frames.
    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: u64,
    /// Fixed delay before the single reconnect attempt after a close.
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
    /// Fan-out buffer per subscriber; slow subscribers past this lag skip
    /// ahead rather than stall the connection.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for RealtimeSection {
    fn default() -> Self {
        Self {
            keepalive_secs: default_keepalive_secs(),
            reconnect_delay_secs: default_reconnect_delay_secs(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct InboxSection {
    /// Polling fallback interval for the SOS inbox; 0 disables polling and
    /// relies on push events alone.
    #[serde(default = "default_poll_secs")]
    pub poll_secs: u64,
}

impl Default for InboxSection {
    fn default() -> Self {
        Self {
            poll_secs: default_poll_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub realtime: RealtimeSection,
    #[serde(default)]
    pub inbox: InboxSection,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

impl ServerConfig {
    /// Resolved WebSocket URL — explicit `ws_url` wins, otherwise the REST
    /// base with the scheme flipped and `/ws` appended.
    pub fn resolved_ws_url(&self) -> String {
        if let Some(url) = &self.ws_url {
            return url.clone();
        }
        let base = self.base_url.trim_end_matches('/');
        let flipped = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            base.to_string()
        };
        format!("{}/ws", flipped)
    }
}

// ---------------------------------------------------------------------------
// Serde defaults
// ---------------------------------------------------------------------------

pub fn default_keepalive_secs() -> u64 {
    25
}

pub fn default_reconnect_delay_secs() -> u64 {
    3
}

pub fn default_channel_capacity() -> usize {
    100
}

pub fn default_poll_secs() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_url_derived_from_base() {
        let cfg = ServerConfig {
            base_url: "http://127.0.0.1:8000".to_string(),
            ws_url: None,
        };
        assert_eq!(cfg.resolved_ws_url(), "ws://127.0.0.1:8000/ws");

        let cfg = ServerConfig {
            base_url: "https://vet.example.org/".to_string(),
            ws_url: None,
        };
        assert_eq!(cfg.resolved_ws_url(), "wss://vet.example.org/ws");
    }

    #[test]
    fn explicit_ws_url_wins() {
        let cfg = ServerConfig {
            base_url: "http://127.0.0.1:8000".to_string(),
            ws_url: Some("ws://other:9000/push".to_string()),
        };
        assert_eq!(cfg.resolved_ws_url(), "ws://other:9000/push");
    }
}
