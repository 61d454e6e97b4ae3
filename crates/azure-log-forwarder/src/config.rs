// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Settings read from the Function App environment.
//!
//! Every reader has a `*_from_lookup` twin that takes the variable source as a
//! closure, so tests do not have to mutate the process environment.

use std::env;
use std::time::Duration;

use lm_logs::ClientConfig;
use tracing::level_filters::LevelFilter;

use crate::error::ConfigError;

/// Company in the target URL `https://{company}.logicmonitor.com`.
pub const PARAMETER_COMPANY_NAME: &str = "LogicMonitorCompanyName";
/// LogicMonitor access id.
pub const PARAMETER_ACCESS_ID: &str = "LogicMonitorAccessId";
/// LogicMonitor access key.
pub const PARAMETER_ACCESS_KEY: &str = "LogicMonitorAccessKey";
/// Connection timeout in milliseconds (default 10000).
pub const PARAMETER_CONNECT_TIMEOUT: &str = "LogApiClientConnectTimeout";
/// Read timeout in milliseconds (default 10000).
pub const PARAMETER_READ_TIMEOUT: &str = "LogApiClientReadTimeout";
/// HTTP client debugging.
pub const PARAMETER_DEBUGGING: &str = "LogApiClientDebugging";
/// Overrides the API base URL derived from the company name.
pub const PARAMETER_BASE_URL: &str = "LogicMonitorBaseUrl";

/// Port the Functions host expects the custom handler to listen on.
pub const PARAMETER_HANDLER_PORT: &str = "FUNCTIONS_CUSTOMHANDLER_PORT";
/// Name of the function route served by the handler.
pub const PARAMETER_FUNCTION_NAME: &str = "LogForwarderFunctionName";
/// Verbosity of the forwarder's own logs.
pub const PARAMETER_LOG_LEVEL: &str = "LogForwarderLogLevel";

pub const DEFAULT_HANDLER_PORT: u16 = 8080;
pub const DEFAULT_FUNCTION_NAME: &str = "LogForwarder";

/// Reads the API client settings from the process environment.
pub fn client_config_from_env() -> Result<ClientConfig, ConfigError> {
    client_config_from_lookup(|name| env::var(name).ok())
}

/// Reads the API client settings through `lookup`.
///
/// The credentials are taken as they are: a missing value becomes an empty
/// string and fails later as an authentication error. Optional settings are
/// applied only when present and not blank, and a value that does not parse
/// is a [`ConfigError`].
pub fn client_config_from_lookup<F>(lookup: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ClientConfig::new(
        lookup(PARAMETER_COMPANY_NAME).unwrap_or_default(),
        lookup(PARAMETER_ACCESS_ID).unwrap_or_default(),
        lookup(PARAMETER_ACCESS_KEY).unwrap_or_default(),
    );

    if let Some(timeout) = optional(&lookup, PARAMETER_CONNECT_TIMEOUT, parse_millis)? {
        config.connect_timeout = timeout;
    }
    if let Some(timeout) = optional(&lookup, PARAMETER_READ_TIMEOUT, parse_millis)? {
        config.read_timeout = timeout;
    }
    if let Some(debugging) = optional(&lookup, PARAMETER_DEBUGGING, parse_bool)? {
        config.debugging = debugging;
    }
    config.base_url = optional(&lookup, PARAMETER_BASE_URL, |v| Ok(v.to_string()))?;

    Ok(config)
}

/// Settings of the custom handler process.
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    pub port: u16,
    pub function_name: String,
    pub log_level: LevelFilter,
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            port: DEFAULT_HANDLER_PORT,
            function_name: DEFAULT_FUNCTION_NAME.to_string(),
            log_level: LevelFilter::INFO,
        }
    }
}

impl HostConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = HostConfig::default();
        Ok(HostConfig {
            port: optional(&lookup, PARAMETER_HANDLER_PORT, parse_port)?.unwrap_or(defaults.port),
            function_name: optional(&lookup, PARAMETER_FUNCTION_NAME, |v| Ok(v.to_string()))?
                .unwrap_or(defaults.function_name),
            log_level: optional(&lookup, PARAMETER_LOG_LEVEL, parse_level)?
                .unwrap_or(defaults.log_level),
        })
    }
}

/// Targets silenced in the handler's log output.
const QUIET_TARGETS: &str = "h2=off,hyper=off,rustls=off";
/// Target of reqwest's connection level read/write tracing.
pub const CLIENT_VERBOSE_TARGET: &str = "reqwest::connect::verbose";

impl HostConfig {
    /// `EnvFilter` directives for the handler process.
    ///
    /// With client debugging on, the API client's body logging and the
    /// connection tracing are let through regardless of the configured level.
    #[must_use]
    pub fn log_filter(&self, client_debugging: bool) -> String {
        let level = self.log_level.to_string().to_lowercase();
        if client_debugging {
            format!("{QUIET_TARGETS},lm_logs=info,{CLIENT_VERBOSE_TARGET}=trace,{level}")
        } else {
            format!("{QUIET_TARGETS},{level}")
        }
    }
}

/// Whether client debugging is requested, without failing on a bad value.
///
/// A bad value is reported by the first invocation instead.
#[must_use]
pub fn client_debugging_from_env() -> bool {
    client_debugging_from_lookup(|name| env::var(name).ok())
}

pub fn client_debugging_from_lookup<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    matches!(optional(&lookup, PARAMETER_DEBUGGING, parse_bool), Ok(Some(true)))
}

fn optional<F, T, P>(lookup: &F, name: &'static str, parse: P) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Result<T, String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    parse(value)
        .map(Some)
        .map_err(|reason| ConfigError::InvalidSetting {
            name,
            value: value.to_string(),
            reason,
        })
}

fn parse_millis(value: &str) -> Result<Duration, String> {
    match value.parse::<u64>() {
        Ok(0) | Err(_) => Err("expected a positive number of milliseconds".to_string()),
        Ok(millis) => Ok(Duration::from_millis(millis)),
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err("expected 'true' or 'false'".to_string())
    }
}

fn parse_port(value: &str) -> Result<u16, String> {
    match value.parse::<u16>() {
        Ok(0) | Err(_) => Err("expected a port between 1 and 65535".to_string()),
        Ok(port) => Ok(port),
    }
}

fn parse_level(value: &str) -> Result<LevelFilter, String> {
    match value.to_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" => Ok(LevelFilter::WARN),
        "error" => Ok(LevelFilter::ERROR),
        _ => Err("must be one of: trace, debug, info, warn, error".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_client_config_required_values() {
        let config = client_config_from_lookup(lookup_from(&[
            (PARAMETER_COMPANY_NAME, "acme"),
            (PARAMETER_ACCESS_ID, "id"),
            (PARAMETER_ACCESS_KEY, "key"),
        ]))
        .unwrap();

        assert_eq!(config.company, "acme");
        assert_eq!(config.access_id, "id");
        assert_eq!(config.access_key, "key");
        assert_eq!(config.connect_timeout, Duration::from_millis(10_000));
        assert_eq!(config.read_timeout, Duration::from_millis(10_000));
        assert!(!config.debugging);
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_client_config_missing_credentials_pass_through() {
        let config = client_config_from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.company, "");
        assert_eq!(config.access_id, "");
        assert_eq!(config.access_key, "");
    }

    #[test]
    fn test_client_config_optional_values() {
        let config = client_config_from_lookup(lookup_from(&[
            (PARAMETER_CONNECT_TIMEOUT, " 2500 "),
            (PARAMETER_READ_TIMEOUT, "30000"),
            (PARAMETER_DEBUGGING, "TRUE"),
            (PARAMETER_BASE_URL, "http://localhost:1234/rest"),
        ]))
        .unwrap();

        assert_eq!(config.connect_timeout, Duration::from_millis(2500));
        assert_eq!(config.read_timeout, Duration::from_millis(30_000));
        assert!(config.debugging);
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:1234/rest"));
    }

    #[test]
    fn test_client_config_blank_optional_values_are_ignored() {
        let config = client_config_from_lookup(lookup_from(&[
            (PARAMETER_CONNECT_TIMEOUT, ""),
            (PARAMETER_READ_TIMEOUT, "   "),
            (PARAMETER_DEBUGGING, "\t"),
        ]))
        .unwrap();

        assert_eq!(config.connect_timeout, Duration::from_millis(10_000));
        assert_eq!(config.read_timeout, Duration::from_millis(10_000));
        assert!(!config.debugging);
    }

    #[test]
    fn test_client_config_non_numeric_timeout_fails_fast() {
        let error =
            client_config_from_lookup(lookup_from(&[(PARAMETER_CONNECT_TIMEOUT, "abc")]))
                .unwrap_err();
        assert_eq!(
            error,
            ConfigError::InvalidSetting {
                name: PARAMETER_CONNECT_TIMEOUT,
                value: "abc".to_string(),
                reason: "expected a positive number of milliseconds".to_string(),
            }
        );
    }

    #[test]
    fn test_client_config_rejects_zero_and_negative_timeouts() {
        for value in ["0", "-5"] {
            assert!(
                client_config_from_lookup(lookup_from(&[(PARAMETER_READ_TIMEOUT, value)]))
                    .is_err(),
                "read timeout '{value}' should be rejected"
            );
        }
    }

    #[test]
    fn test_client_config_invalid_debugging_flag() {
        let error = client_config_from_lookup(lookup_from(&[(PARAMETER_DEBUGGING, "yes")]))
            .unwrap_err();
        assert!(error.to_string().contains(PARAMETER_DEBUGGING));
    }

    #[test]
    fn test_host_config_defaults() {
        assert_eq!(
            HostConfig::from_lookup(lookup_from(&[])).unwrap(),
            HostConfig::default()
        );
    }

    #[test]
    fn test_host_config_values() {
        let config = HostConfig::from_lookup(lookup_from(&[
            (PARAMETER_HANDLER_PORT, "7071"),
            (PARAMETER_FUNCTION_NAME, "Forward"),
            (PARAMETER_LOG_LEVEL, "Trace"),
        ]))
        .unwrap();

        assert_eq!(config.port, 7071);
        assert_eq!(config.function_name, "Forward");
        assert_eq!(config.log_level, LevelFilter::TRACE);
    }

    #[test]
    fn test_host_config_invalid_values() {
        assert!(HostConfig::from_lookup(lookup_from(&[(PARAMETER_HANDLER_PORT, "0")])).is_err());
        assert!(
            HostConfig::from_lookup(lookup_from(&[(PARAMETER_HANDLER_PORT, "99999")])).is_err()
        );
        assert!(HostConfig::from_lookup(lookup_from(&[(PARAMETER_LOG_LEVEL, "loud")])).is_err());
    }

    /// Whether client body logging and connection tracing pass `filter`.
    fn client_tracing_under(filter: &str) -> (bool, bool) {
        use tracing_subscriber::layer::SubscriberExt;

        let subscriber = tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::try_new(filter).unwrap());
        tracing::subscriber::with_default(subscriber, || {
            (
                tracing::enabled!(target: "lm_logs::api", tracing::Level::INFO),
                tracing::enabled!(target: "reqwest::connect::verbose", tracing::Level::TRACE),
            )
        })
    }

    #[test]
    fn test_log_filter_default() {
        let filter = HostConfig::default().log_filter(false);
        assert_eq!(filter, "h2=off,hyper=off,rustls=off,info");
        assert_eq!(client_tracing_under(&filter), (true, false));
    }

    #[test]
    fn test_client_debugging_is_visible_at_default_level() {
        let filter = HostConfig::default().log_filter(true);
        assert_eq!(client_tracing_under(&filter), (true, true));
    }

    #[test]
    fn test_client_debugging_survives_quiet_level() {
        let config = HostConfig {
            log_level: LevelFilter::ERROR,
            ..HostConfig::default()
        };
        assert_eq!(client_tracing_under(&config.log_filter(false)), (false, false));
        assert_eq!(client_tracing_under(&config.log_filter(true)), (true, true));
    }

    #[test]
    fn test_client_debugging_from_lookup() {
        assert!(client_debugging_from_lookup(lookup_from(&[(PARAMETER_DEBUGGING, "True")])));
        assert!(!client_debugging_from_lookup(lookup_from(&[(PARAMETER_DEBUGGING, "false")])));
        assert!(!client_debugging_from_lookup(lookup_from(&[(PARAMETER_DEBUGGING, "yes")])));
        assert!(!client_debugging_from_lookup(lookup_from(&[])));
    }
}
