use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{FrcError, Result};

/// Connection settings for an [`RmiClient`](super::RmiClient).
///
/// ```rust,ignore
/// let config = RmiConfig {
///     host: "192.168.1.22".to_string(),
///     ..RmiConfig::default()
/// };
/// config.validate()?;
/// println!("handshake at {}", config.connection_url());
/// let client = RmiClient::connect(config).await?;
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RmiConfig {
    pub host: String,
    /// Port that answers the `FRC_Connect` handshake.
    pub startup_port: u16,
    /// Operational port, used unless the handshake reassigns it.
    pub main_port: u16,
    /// Bound on each individual connect attempt.
    pub connect_timeout: Duration,
    /// Bound on writing one request.
    pub write_timeout: Duration,
    /// Bound on waiting for one complete response.
    pub read_timeout: Duration,
    /// Connect attempts per port before giving up.
    pub attempts: u32,
    pub retry_delay: Duration,
    /// Pause between closing the startup socket and opening the main port.
    pub startup_pause: Duration,
    /// JSON Lines file receiving every raw pose and joint reading.
    /// `None` disables the log.
    pub telemetry_log: Option<PathBuf>,
}

impl RmiConfig {
    pub fn new(host: impl Into<String>, startup_port: u16) -> Self {
        Self {
            host: host.into(),
            startup_port,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(FrcError::InvalidConfig("host cannot be empty".to_string()));
        }
        if self.startup_port == 0 || self.main_port == 0 {
            return Err(FrcError::InvalidConfig(
                "port numbers must be greater than 0".to_string(),
            ));
        }
        if self.attempts == 0 {
            return Err(FrcError::InvalidConfig(
                "at least one connect attempt is required".to_string(),
            ));
        }
        if self.connect_timeout.is_zero() || self.read_timeout.is_zero() || self.write_timeout.is_zero() {
            return Err(FrcError::InvalidConfig("timeouts must be non-zero".to_string()));
        }
        Ok(())
    }

    /// `host:startup_port`, the address of the handshake.
    pub fn connection_url(&self) -> String {
        address(&self.host, self.startup_port)
    }
}

impl Default for RmiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            startup_port: 16001,
            main_port: 16002,
            connect_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(15),
            attempts: 5,
            retry_delay: Duration::from_millis(500),
            startup_pause: Duration::from_millis(250),
            telemetry_log: Some(PathBuf::from("robot_telemetry.jsonl")),
        }
    }
}

pub(crate) fn address(host: &str, port: u16) -> String {
    format!("{}:{}", host, port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RmiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.connection_url(), "127.0.0.1:16001");
        assert_eq!(address(&config.host, config.main_port), "127.0.0.1:16002");
    }

    #[test]
    fn zero_attempts_rejected() {
        let config = RmiConfig {
            attempts: 0,
            ..RmiConfig::default()
        };
        assert!(matches!(config.validate(), Err(FrcError::InvalidConfig(_))));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: RmiConfig = serde_json::from_str(r#"{"host": "10.0.0.5"}"#).unwrap();
        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.main_port, 16002);
    }
}
