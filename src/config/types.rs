//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::limits::LimitsConfig;
use super::seed::SeedUser;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server identity and hosted domains.
    pub server: ServerConfig,
    /// Session limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Accounts loaded into storage at startup.
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name used in logs (e.g., "xmpp.wonderland.lit").
    pub name: String,
    /// Domains whose accounts are hosted here.
    pub domains: Vec<String>,
    /// Prometheus metrics HTTP port; no endpoint when unset.
    pub metrics_port: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[server]
name = "xmpp.wonderland.lit"
domains = ["wonderland.lit"]
metrics_port = 9191

[[users]]
jid = "alice@wonderland.lit"
password = "secret"

[[users.roster]]
jid = "hatter@wonderland.lit"
subscription = "both"
groups = ["Buddies"]
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.domains, ["wonderland.lit"]);
        assert_eq!(config.server.metrics_port, Some(9191));
        assert_eq!(config.limits.session_queue, 256);
        assert_eq!(config.users.len(), 1);
        assert_eq!(config.users[0].roster[0].groups, ["Buddies"]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[server\nname = ").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
