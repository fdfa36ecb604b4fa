use std::fs;
use tracing::{debug, error, info};

use crate::types::client_config::{AppConfig, ConfigError};

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    info!("Loading configuration from: {}", path);

    let contents = fs::read_to_string(path)?;
    debug!("Processing file: {}", path);

    if contents.trim().is_empty() {
        error!("Configuration file is empty");
        return Err(ConfigError::InvalidConfig("empty file".into()));
    }

    let config: AppConfig = toml::from_str(&contents)?;

    info!("Configuration loaded successfully");
    debug!("Config: {:?}", config);

    validate_config(&config)?;

    info!("Config validated");

    Ok(config)
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.base_url.trim().is_empty() {
        return Err(ConfigError::InvalidConfig("base_url cannot be empty".into()));
    }

    if !config.server.base_url.starts_with("http://") && !config.server.base_url.starts_with("https://") {
        return Err(ConfigError::InvalidConfig(
            "base_url must start with http:// or https://".into(),
        ));
    }

    if config.realtime.keepalive_secs == 0 {
        return Err(ConfigError::InvalidConfig(
            "keepalive_secs must be greater than 0".into(),
        ));
    }

    if config.realtime.reconnect_delay_secs == 0 {
        return Err(ConfigError::InvalidConfig(
            "reconnect_delay_secs must be greater than 0".into(),
        ));
    }

    if config.realtime.channel_capacity == 0 {
        return Err(ConfigError::InvalidConfig(
            "channel_capacity must be greater than 0".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> Result<AppConfig, ConfigError> {
        let config: AppConfig = toml::from_str(toml_str)?;
        validate_config(&config)?;
        Ok(config)
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let cfg = parse("[server]\nbase_url = \"http://127.0.0.1:8000\"\n").unwrap();
        assert_eq!(cfg.realtime.keepalive_secs, 25);
        assert_eq!(cfg.realtime.reconnect_delay_secs, 3);
        assert_eq!(cfg.realtime.channel_capacity, 100);
        assert_eq!(cfg.inbox.poll_secs, 60);
    }

    #[test]
    fn rejects_non_http_base_url() {
        assert!(parse("[server]\nbase_url = \"ftp://host\"\n").is_err());
    }

    #[test]
    fn rejects_zero_reconnect_delay() {
        let toml_str = "[server]\nbase_url = \"http://h\"\n[realtime]\nreconnect_delay_secs = 0\n";
        assert!(parse(toml_str).is_err());
    }
}
