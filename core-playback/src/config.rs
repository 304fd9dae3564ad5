//! # Player Configuration
//!
//! Timing and buffering knobs for the playback controller.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback controller configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Maximum time to wait for the element to report it can play through.
    ///
    /// When exceeded, the play attempt is abandoned and the controller
    /// settles in the stopped state.
    ///
    /// Default: 30 seconds.
    #[serde(default = "default_ready_timeout")]
    pub ready_timeout: Duration,

    /// How often the end-offset watchdog samples the playback position.
    ///
    /// Default: 100 ms.
    #[serde(default = "default_watchdog_interval")]
    pub watchdog_interval: Duration,

    /// Capacity of the broadcast event bus.
    ///
    /// Default: 100 events.
    #[serde(default = "default_event_buffer_size")]
    pub event_buffer_size: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            ready_timeout: default_ready_timeout(),
            watchdog_interval: default_watchdog_interval(),
            event_buffer_size: default_event_buffer_size(),
        }
    }
}

impl PlayerConfig {
    /// Override the readiness timeout.
    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    /// Override the watchdog sampling interval.
    pub fn with_watchdog_interval(mut self, interval: Duration) -> Self {
        self.watchdog_interval = interval;
        self
    }

    /// Override the event bus capacity.
    pub fn with_event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = size;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.ready_timeout.is_zero() {
            return Err("ready_timeout must be > 0".to_string());
        }

        if self.watchdog_interval.is_zero() {
            return Err("watchdog_interval must be > 0".to_string());
        }

        if self.event_buffer_size == 0 {
            return Err("event_buffer_size must be > 0".to_string());
        }

        Ok(())
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_ready_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_watchdog_interval() -> Duration {
    Duration::from_millis(100)
}

fn default_event_buffer_size() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlayerConfig::default();
        assert_eq!(config.ready_timeout, Duration::from_secs(30));
        assert_eq!(config.watchdog_interval, Duration::from_millis(100));
        assert_eq!(config.event_buffer_size, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_values() {
        let config = PlayerConfig::default().with_ready_timeout(Duration::ZERO);
        assert!(config.validate().is_err());

        let config = PlayerConfig::default().with_watchdog_interval(Duration::ZERO);
        assert!(config.validate().is_err());

        let config = PlayerConfig::default().with_event_buffer_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: PlayerConfig =
            serde_json::from_str(r#"{"event_buffer_size": 8}"#).unwrap();
        assert_eq!(config.event_buffer_size, 8);
        assert_eq!(config.ready_timeout, Duration::from_secs(30));
    }
}
