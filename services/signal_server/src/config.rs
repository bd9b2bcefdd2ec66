//! Signal server configuration

use crate::error::{Result, ServerError};
use pulse_market_data::ProviderConfig;
use pulse_strategies::StrategyConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// WebSocket server bind address
    pub bind_address: String,

    /// WebSocket server port
    pub port: u16,

    /// Maximum number of concurrent WebSocket connections
    pub max_connections: usize,

    /// Enable CORS for web browsers
    pub enable_cors: bool,

    /// Heartbeat interval in seconds
    pub heartbeat_interval_secs: u64,

    pub scheduler: SchedulerConfig,

    pub provider: ProviderConfig,

    pub strategies: StrategyConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds between polling ticks; the first tick fires one interval after start
    pub tick_interval_secs: u64,
}

impl SchedulerConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 60,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 4000,
            max_connections: 1000,
            enable_cors: true,
            heartbeat_interval_secs: 30,
            scheduler: SchedulerConfig::default(),
            provider: ProviderConfig::default(),
            strategies: StrategyConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .map_err(|e| ServerError::Configuration {
                message: format!("Invalid bind address: {}", e),
            })
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| -> Result<()> {
            Err(ServerError::Configuration {
                message: message.to_string(),
            })
        };

        if self.scheduler.tick_interval_secs == 0 {
            return invalid("scheduler.tick_interval_secs must be at least 1");
        }
        if self.heartbeat_interval_secs == 0 {
            return invalid("heartbeat_interval_secs must be at least 1");
        }
        if self.provider.max_concurrent_requests == 0 {
            return invalid("provider.max_concurrent_requests must be at least 1");
        }
        if self.max_connections == 0 {
            return invalid("max_connections must be at least 1");
        }

        self.socket_addr()?;
        self.strategies.validate()?;
        Ok(())
    }
}

/// Load a config file: JSON when the extension is `.json`, TOML otherwise.
///
/// Missing fields take their defaults; the result is validated.
pub async fn load_config(path: &Path) -> Result<ServerConfig> {
    let contents = tokio::fs::read_to_string(path).await?;

    let config: ServerConfig = if path.extension().and_then(|s| s.to_str()) == Some("json") {
        serde_json::from_str(&contents)?
    } else {
        toml::from_str(&contents)?
    };

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_types::{Interval, Lookback};

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();

        assert_eq!(config.port, 4000);
        assert_eq!(config.scheduler.tick_interval(), Duration::from_secs(60));
        assert_eq!(config.provider.max_concurrent_requests, 8);
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:4000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            port = 5050

            [scheduler]
            tick_interval_secs = 15

            [strategies.momentum]
            lookback = "20d"

            [strategies.adx]
            interval = "15m"
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 5050);
        assert_eq!(config.heartbeat_interval_secs, 30);
        assert_eq!(config.scheduler.tick_interval_secs, 15);
        assert_eq!(config.strategies.momentum.lookback, Lookback::Days(20));
        assert_eq!(config.strategies.momentum.threshold_pct, 3.0);
        assert_eq!(config.strategies.adx.interval, Interval::Min15);
        assert_eq!(config.strategies.swing.trend, Interval::Day1);
    }

    #[test]
    fn test_bad_lookback_fails_to_load() {
        let err = toml::from_str::<ServerConfig>(
            r#"
            [strategies.breakout]
            lookback = "2w"
            "#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("Unsupported duration format '2w'"));
    }

    #[test]
    fn test_validate_rejects_zero_intervals() {
        let mut config = ServerConfig::default();
        config.scheduler.tick_interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.heartbeat_interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.provider.max_concurrent_requests = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_bind_address() {
        let config = ServerConfig {
            bind_address: "not an address".to_string(),
            ..ServerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ServerError::Configuration { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_json_config() {
        let path = std::env::temp_dir().join(format!("pulse-config-{}.json", std::process::id()));
        tokio::fs::write(&path, r#"{"port": 4100, "enable_cors": false}"#)
            .await
            .unwrap();

        let config = load_config(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(config.port, 4100);
        assert!(!config.enable_cors);
        assert_eq!(config.max_connections, 1000);
    }
}
