//! Host pipeline configuration.
//!
//! Compile-time defaults with environment overrides, applied in
//! `from_env()`; builder methods win over both.
//!
//! # Environment variables
//!
//! - `AXP_ACK_POLL_MS` - input acknowledgment poll interval (default 10)
//! - `AXP_RESULT_POLL_MS` - output region poll interval (default 10)
//! - `AXP_RESULTS_FILE` - durable result store path (default `results.txt`)

use std::path::PathBuf;
use std::time::Duration;

use axpipe_core::env::env_get;

/// Configuration for the three pipeline workers.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// How often the dispatch worker re-reads the input flag while waiting
    /// for the device to acknowledge a value.
    pub ack_poll_interval: Duration,

    /// How long the collection worker sleeps between polls when no result
    /// is pending. Bounds CPU against a device that cannot interrupt.
    pub result_poll_interval: Duration,

    /// Append-only result store, one decimal integer per line.
    pub results_path: PathBuf,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl HostConfig {
    /// Compile-time defaults with `AXP_*` environment overrides.
    pub fn from_env() -> Self {
        Self {
            ack_poll_interval: Duration::from_millis(env_get("AXP_ACK_POLL_MS", 10)),
            result_poll_interval: Duration::from_millis(env_get("AXP_RESULT_POLL_MS", 10)),
            results_path: PathBuf::from(env_get(
                "AXP_RESULTS_FILE",
                "results.txt".to_string(),
            )),
        }
    }

    pub fn ack_poll_interval(mut self, interval: Duration) -> Self {
        self.ack_poll_interval = interval;
        self
    }

    pub fn result_poll_interval(mut self, interval: Duration) -> Self {
        self.result_poll_interval = interval;
        self
    }

    pub fn results_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.results_path = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let config = HostConfig::from_env()
            .ack_poll_interval(Duration::from_millis(1))
            .results_path("/tmp/axpipe-test.txt");

        assert_eq!(config.ack_poll_interval, Duration::from_millis(1));
        assert_eq!(config.results_path, PathBuf::from("/tmp/axpipe-test.txt"));
    }
}
