//! Logging configuration parsing from environment variables.
//!
//! Logs go to stderr, which Splunk captures into `splunkd.log`; stdout is
//! reserved for events.

use std::env;
use tracing::Level;

/// Observability environment configuration
#[derive(Debug, Clone)]
pub struct ObservabilityEnvConfig {
    pub log_level: Level,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
        }
    }
}

impl ObservabilityEnvConfig {
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("ASM_LOG_LEVEL")
                .ok()
                .and_then(|level| level.trim().parse::<Level>().ok())
                .unwrap_or(Level::INFO),
        }
    }
}
