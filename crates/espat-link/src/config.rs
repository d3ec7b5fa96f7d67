//! Link configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for a [`CommandChannel`](crate::CommandChannel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkConfig {
    /// Size of the shared command/response buffer in bytes.
    pub buffer_capacity: usize,
    /// Read timeout installed on the channel between commands.
    pub read_timeout_ms: u64,
    /// Discard stale inbound bytes before sending each command.
    pub drain_before_command: bool,
    /// Quiet period that ends a drain.
    pub drain_timeout_ms: u64,
}

impl LinkConfig {
    /// Default buffer size; fits every reply of the WiFi command set.
    pub const DEFAULT_BUFFER_CAPACITY: usize = 255;

    /// The between-commands read timeout.
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// The drain quiet period.
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        LinkConfig {
            buffer_capacity: Self::DEFAULT_BUFFER_CAPACITY,
            read_timeout_ms: 1000,
            drain_before_command: false,
            drain_timeout_ms: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LinkConfig::default();
        assert_eq!(config.buffer_capacity, 255);
        assert_eq!(config.read_timeout(), Duration::from_secs(1));
        assert!(!config.drain_before_command);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: LinkConfig = serde_yaml::from_str("buffer_capacity: 512\n").unwrap();
        assert_eq!(config.buffer_capacity, 512);
        assert_eq!(config.read_timeout_ms, 1000);
        assert_eq!(config.drain_timeout(), Duration::from_millis(10));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<LinkConfig, _> = serde_yaml::from_str("baud: 115200\n");
        assert!(result.is_err());
    }
}
