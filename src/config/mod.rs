//! Configuration module for the ASM collector.
//!
//! Settings are read through a [`SettingsSource`] (conf files, environment,
//! or an in-memory map) and resolved once per run into an [`AsmConfig`].
//! Logging is configured separately from the environment.

mod observability_config;
mod proxy_config;

pub use observability_config::ObservabilityEnvConfig;
pub use proxy_config::resolve_proxy;

use crate::domain::errors::CollectorError;
use crate::domain::ports::SettingsSource;
use std::fmt;
use std::time::Duration;
use tracing::warn;

/// Splunk app that owns the settings stanza.
pub const APP_NAME: &str = "Tenable_Attack_Surface_Management_for_Splunk";
/// Conf file name, without the `.conf` extension.
pub const CONF_FILE: &str = "asm_settings";
pub const CONF_STANZA: &str = "settings";

pub const DEFAULT_BASE_URL: &str = "https://asm.cloud.tenable.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_USER_ACTION_LIMIT: usize = 200;
pub const MAX_USER_ACTION_LIMIT: usize = 500;

/// Resolved settings for a single collection run.
#[derive(Clone)]
pub struct AsmConfig {
    pub api_key: String,
    pub proxy: Option<String>,
    pub timeout: Duration,
    pub base_url: String,
    pub user_action_limit: usize,
}

impl AsmConfig {
    /// Resolve configuration from a settings source.
    ///
    /// Only a missing `api_key` or an inconsistent structured proxy is an
    /// error. Numeric settings that fail to parse fall back to their
    /// defaults.
    pub fn from_source(source: &dyn SettingsSource) -> Result<Self, CollectorError> {
        let api_key = get_str(source, "api_key");
        if api_key.is_empty() {
            return Err(CollectorError::config(format!(
                "Missing api_key in {}.conf",
                CONF_FILE
            )));
        }

        let proxy = resolve_proxy(source)?;

        let timeout = Duration::from_secs(get_positive_int(
            source,
            "timeout_seconds",
            DEFAULT_TIMEOUT_SECS,
        ));

        let base_url = match get_str(source, "base_url") {
            url if url.is_empty() => DEFAULT_BASE_URL.to_string(),
            url => url.trim_end_matches('/').to_string(),
        };

        let user_action_limit = (get_positive_int(
            source,
            "user_action_limit",
            DEFAULT_USER_ACTION_LIMIT as u64,
        ) as usize)
            .min(MAX_USER_ACTION_LIMIT);

        Ok(Self {
            api_key,
            proxy,
            timeout,
            base_url,
            user_action_limit,
        })
    }
}

impl fmt::Debug for AsmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsmConfig")
            .field("api_key", &"<redacted>")
            .field("proxy", &self.proxy.as_ref().map(|_| "<set>"))
            .field("timeout", &self.timeout)
            .field("base_url", &self.base_url)
            .field("user_action_limit", &self.user_action_limit)
            .finish()
    }
}

/// Trimmed string setting, empty when unset.
pub fn get_str(source: &dyn SettingsSource, key: &str) -> String {
    source
        .get(key)
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

/// Positive integer setting. Unset, unparsable, zero or negative values all
/// yield `default`.
pub fn get_positive_int(source: &dyn SettingsSource, key: &str, default: u64) -> u64 {
    let raw = get_str(source, key);
    if raw.is_empty() {
        return default;
    }
    match raw.parse::<i64>() {
        Ok(value) if value > 0 => value as u64,
        _ => {
            warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::settings::MemorySettings;

    fn settings(pairs: &[(&str, &str)]) -> MemorySettings {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = AsmConfig::from_source(&settings(&[])).unwrap_err();
        assert!(matches!(err, CollectorError::Config(_)));
        assert_eq!(err.to_string(), "Missing api_key in asm_settings.conf");
    }

    #[test]
    fn test_whitespace_api_key_is_missing() {
        let err = AsmConfig::from_source(&settings(&[("api_key", "   \t")])).unwrap_err();
        assert!(matches!(err, CollectorError::Config(_)));
    }

    #[test]
    fn test_defaults() {
        let config = AsmConfig::from_source(&settings(&[("api_key", " secret ")])).unwrap();

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.proxy, None);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.user_action_limit, 200);
    }

    #[test]
    fn test_non_numeric_timeout_falls_back_to_default() {
        for raw in ["abc", "", "12.5", "0", "-30"] {
            let config = AsmConfig::from_source(&settings(&[
                ("api_key", "k"),
                ("timeout_seconds", raw),
            ]))
            .unwrap();
            assert_eq!(config.timeout, Duration::from_secs(60), "input {:?}", raw);
        }
    }

    #[test]
    fn test_numeric_timeout_is_used() {
        let config = AsmConfig::from_source(&settings(&[
            ("api_key", "k"),
            ("timeout_seconds", " 15 "),
        ]))
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_user_action_limit_is_clamped() {
        let cap = AsmConfig::from_source(&settings(&[
            ("api_key", "k"),
            ("user_action_limit", "5000"),
        ]))
        .unwrap();
        assert_eq!(cap.user_action_limit, MAX_USER_ACTION_LIMIT);

        let negative = AsmConfig::from_source(&settings(&[
            ("api_key", "k"),
            ("user_action_limit", "-1"),
        ]))
        .unwrap();
        assert_eq!(negative.user_action_limit, DEFAULT_USER_ACTION_LIMIT);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = AsmConfig::from_source(&settings(&[
            ("api_key", "k"),
            ("base_url", "http://127.0.0.1:8080/"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AsmConfig::from_source(&settings(&[
            ("api_key", "super-secret"),
            ("proxy", "http://user:pw@proxy:3128"),
        ]))
        .unwrap();

        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("pw@"));
    }
}
