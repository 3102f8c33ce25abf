//! Server configuration module.
//!
//! ## Load Order (later overrides earlier)
//! 1. Default values
//! 2. Config file (`STOCKROOM_CONFIG`, else `<config dir>/server.toml`)
//! 3. Environment variables
//!
//! ```toml
//! host = "0.0.0.0"          # IP literal or resolvable name
//! port = 5000
//! database_path = "./inventory.db"
//! max_connections = 5
//! ```

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use stockroom_db::DbConfig;
use tracing::{debug, info};

/// Port the browser client expects by default.
pub const DEFAULT_PORT: u16 = 5000;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,

    /// HTTP port.
    pub port: u16,

    /// SQLite database file, created if missing.
    pub database_path: PathBuf,

    /// Pool size.
    pub max_connections: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            database_path: PathBuf::from("./inventory.db"),
            max_connections: 5,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// A missing config file is not an error; an unreadable or malformed
    /// one is.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| env::var("STOCKROOM_CONFIG").ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading server config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Applies `STOCKROOM_*` overrides read through `var`.
    pub fn apply_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = var("STOCKROOM_HOST") {
            self.host = host;
        }

        if let Some(port) = var("STOCKROOM_PORT") {
            self.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue("STOCKROOM_PORT".to_string()))?;
        }

        if let Some(path) = var("STOCKROOM_DB_PATH") {
            self.database_path = PathBuf::from(path);
        }

        if let Some(max) = var("STOCKROOM_MAX_CONNECTIONS") {
            self.max_connections = max
                .parse()
                .map_err(|_| ConfigError::InvalidValue("STOCKROOM_MAX_CONNECTIONS".to_string()))?;
        }

        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::MissingRequired("host".to_string()));
        }

        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired("database_path".to_string()));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "max_connections must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolves `host:port` to the address to bind.
    ///
    /// `host` may be an IP literal or a name such as `localhost`; the first
    /// resolved address wins.
    pub async fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        let invalid = || ConfigError::InvalidValue(format!("host '{}'", self.host));

        let mut addrs = tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|_| invalid())?;
        let addr = addrs.next().ok_or_else(invalid)?;

        debug!(host = %self.host, %addr, "Resolved bind address");
        Ok(addr)
    }

    /// Pool settings for [`stockroom_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).max_connections(self.max_connections)
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stockroom", "stockroom")
            .map(|dirs| dirs.config_dir().join("server.toml"))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.database_path, PathBuf::from("./inventory.db"));
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address().await.unwrap().port(), 5000);
    }

    #[tokio::test]
    async fn test_host_name_resolves() {
        let env = vars(&[("STOCKROOM_HOST", "localhost"), ("STOCKROOM_PORT", "8080")]);
        let mut config = ServerConfig::default();
        config.apply_overrides(|k| env.get(k).cloned()).unwrap();
        assert!(config.validate().is_ok());

        let addr = config.bind_address().await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 8080);
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_invalid() {
        let config = ServerConfig {
            host: "not a host name".to_string(),
            ..Default::default()
        };
        let err = config.bind_address().await.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref v) if v.contains("not a host name")));
    }

    #[test]
    fn test_env_overrides() {
        let env = vars(&[
            ("STOCKROOM_HOST", "127.0.0.1"),
            ("STOCKROOM_PORT", "8080"),
            ("STOCKROOM_DB_PATH", "/tmp/stock.db"),
            ("STOCKROOM_MAX_CONNECTIONS", "2"),
        ]);

        let mut config = ServerConfig::default();
        config.apply_overrides(|k| env.get(k).cloned()).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_path, PathBuf::from("/tmp/stock.db"));
        assert_eq!(config.db_config().max_connections, 2);
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let env = vars(&[("STOCKROOM_PORT", "five thousand")]);
        let mut config = ServerConfig::default();
        let err = config.apply_overrides(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref v) if v == "STOCKROOM_PORT"));
    }

    #[test]
    fn test_validate_rejects_zero_pool() {
        let config = ServerConfig {
            max_connections: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(&path, "port = 7000\n").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let config: ServerConfig = toml::from_str(&contents).unwrap();

        assert_eq!(config.port, 7000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.max_connections, 5);
    }
}
