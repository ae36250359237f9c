//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every event
    pub service_name: String,

    /// Filter directives (trace, debug, info, warn, error, or per-target)
    pub log_level: String,

    /// JSON lines instead of human-readable output
    pub json_logs: bool,

    /// Include source file and line in each event
    pub with_location: bool,

    /// Network being mirrored (mainnet, testnet, ...)
    pub network: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "mirror-importer".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            with_location: false,
            network: "demo".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MIRROR_SERVICE_NAME`: Service name (default: mirror-importer)
    /// - `MIRROR_LOG_LEVEL` or `RUST_LOG`: Filter directives (default: info)
    /// - `MIRROR_JSON_LOGS`: JSON output (default: true in containers)
    /// - `MIRROR_LOG_LOCATION`: Include file and line (default: false)
    /// - `MIRROR_NETWORK`: Network name (default: demo)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over any variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();
        let flag = |value: String| value.eq_ignore_ascii_case("true") || value == "1";

        Self {
            service_name: lookup("MIRROR_SERVICE_NAME").unwrap_or(defaults.service_name),
            log_level: lookup("MIRROR_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            json_logs: lookup("MIRROR_JSON_LOGS").map(flag).unwrap_or(is_container),
            with_location: lookup("MIRROR_LOG_LOCATION")
                .map(flag)
                .unwrap_or(defaults.with_location),
            network: lookup("MIRROR_NETWORK").unwrap_or(defaults.network),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::from_lookup(lookup(&[]));
        assert_eq!(config, TelemetryConfig::default());
    }

    #[test]
    fn test_mirror_level_wins_over_rust_log() {
        let config = TelemetryConfig::from_lookup(lookup(&[
            ("RUST_LOG", "warn"),
            ("MIRROR_LOG_LEVEL", "debug,mn_02_stream_reader=trace"),
        ]));
        assert_eq!(config.log_level, "debug,mn_02_stream_reader=trace");

        let config = TelemetryConfig::from_lookup(lookup(&[("RUST_LOG", "warn")]));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_json_defaults_on_in_containers() {
        let config = TelemetryConfig::from_lookup(lookup(&[("DOCKER_CONTAINER", "1")]));
        assert!(config.json_logs);

        let config = TelemetryConfig::from_lookup(lookup(&[
            ("DOCKER_CONTAINER", "1"),
            ("MIRROR_JSON_LOGS", "false"),
        ]));
        assert!(!config.json_logs);
    }
}
