//! Modem configuration loaded from YAML.
//!
//! ```yaml
//! link:
//!   buffer_capacity: 255
//!   read_timeout_ms: 1000
//!   drain_before_command: true
//! timeouts:
//!   join_ms: 15000
//! ```
//!
//! Every key is optional; unknown keys are rejected.

use std::path::{Path, PathBuf};
use std::time::Duration;

use espat_link::LinkConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a [`ModemConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The YAML did not match the configuration schema.
    #[error("invalid modem configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Reply deadlines per command class, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommandTimeouts {
    /// Settings and queries.
    pub basic_ms: u64,
    /// Joining the saved AP.
    pub join_saved_ms: u64,
    /// Joining an AP by SSID.
    pub join_ms: u64,
    /// Starting or stopping a server.
    pub server_ms: u64,
}

impl CommandTimeouts {
    /// Deadline for settings and queries.
    pub fn basic(&self) -> Duration {
        Duration::from_millis(self.basic_ms)
    }

    /// Deadline for `AT+CWJAP`.
    pub fn join_saved(&self) -> Duration {
        Duration::from_millis(self.join_saved_ms)
    }

    /// Deadline for `AT+CWJAP=`.
    pub fn join(&self) -> Duration {
        Duration::from_millis(self.join_ms)
    }

    /// Deadline for `AT+CIPSERVER=`.
    pub fn server(&self) -> Duration {
        Duration::from_millis(self.server_ms)
    }
}

impl Default for CommandTimeouts {
    fn default() -> Self {
        CommandTimeouts {
            basic_ms: 500,
            join_saved_ms: 1000,
            join_ms: 3000,
            server_ms: 3000,
        }
    }
}

/// Everything needed to drive a modem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModemConfig {
    /// Buffer and link settings.
    pub link: LinkConfig,
    /// Command deadlines.
    pub timeouts: CommandTimeouts,
}

impl ModemConfig {
    /// Parse from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_is_default() {
        let config = ModemConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, ModemConfig::default());
        assert_eq!(config.timeouts.basic(), Duration::from_millis(500));
        assert_eq!(config.link.buffer_capacity, 255);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
link:
  drain_before_command: true
timeouts:
  join_ms: 15000
"#;
        let config = ModemConfig::from_yaml_str(yaml).unwrap();
        assert!(config.link.drain_before_command);
        assert_eq!(config.link.read_timeout_ms, 1000);
        assert_eq!(config.timeouts.join(), Duration::from_secs(15));
        assert_eq!(config.timeouts.server(), Duration::from_secs(3));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(matches!(
            ModemConfig::from_yaml_str("timeouts:\n  scan_ms: 10\n"),
            Err(ConfigError::Yaml(_))
        ));
        assert!(ModemConfig::from_yaml_str("port: /dev/ttyUSB0\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = ModemConfig::from_yaml_file("/nonexistent/espat.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/espat.yaml"));
    }

    #[test]
    fn test_serialize_round_trip() {
        let mut config = ModemConfig::default();
        config.timeouts.basic_ms = 750;
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert_eq!(ModemConfig::from_yaml_str(&yaml).unwrap(), config);
    }
}
