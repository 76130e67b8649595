//! Store configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default record key holding the board collection.
pub const DEFAULT_BOARDS_KEY: &str = "corkboard.boards";

/// Default prefix for per-namespace proposal records.
pub const DEFAULT_PROPOSALS_PREFIX: &str = "corkboard.proposals";

/// Default simulated round-trip latency of gateway calls.
pub const DEFAULT_LATENCY_MS: u64 = 150;

/// Configuration for the board store and its persistence gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Record key for the board collection.
    pub boards_key: String,
    /// Prefix for proposal records (`<prefix>.<namespace>`).
    pub proposals_key_prefix: String,
    /// Simulated latency for each load/save, in milliseconds.
    pub latency_ms: u64,
    /// Seed a welcome board when durable storage is empty.
    pub seed_welcome_board: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            boards_key: DEFAULT_BOARDS_KEY.to_string(),
            proposals_key_prefix: DEFAULT_PROPOSALS_PREFIX.to_string(),
            latency_ms: DEFAULT_LATENCY_MS,
            seed_welcome_board: true,
        }
    }
}

impl StoreConfig {
    /// Parse a configuration; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Configuration without simulated latency.
    pub fn immediate() -> Self {
        Self {
            latency_ms: 0,
            ..Self::default()
        }
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = StoreConfig::from_json(r#"{"latency_ms": 5}"#).unwrap();
        assert_eq!(config.latency(), Duration::from_millis(5));
        assert_eq!(config.boards_key, DEFAULT_BOARDS_KEY);
        assert!(config.seed_welcome_board);
    }

    #[test]
    fn test_immediate_has_no_latency() {
        assert!(StoreConfig::immediate().latency().is_zero());
    }
}
