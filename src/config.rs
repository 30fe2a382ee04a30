//! Server configuration.
//!
//! Every setting has a default and can be overridden through a
//! `MASTERBLOG_*` environment variable.

use std::env;
use std::str::FromStr;

use chrono::Duration;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host to bind to (default: "0.0.0.0")
    pub host: String,

    /// Port to bind to (default: 5002)
    pub port: u16,

    /// Requests allowed per client and window (default: 100)
    pub rate_limit: usize,

    /// Rate-limit window (default: 60 seconds)
    pub rate_window: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5002,
            rate_limit: 100,
            rate_window: Duration::minutes(1),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; missing keys keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let rate_limit = parse_var(&lookup, "MASTERBLOG_RATE_LIMIT", defaults.rate_limit)?;
        if rate_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "MASTERBLOG_RATE_LIMIT",
                value: rate_limit.to_string(),
                reason: "limit must be at least 1".to_string(),
            });
        }

        let window_secs = parse_var(
            &lookup,
            "MASTERBLOG_RATE_WINDOW_SECS",
            defaults.rate_window.num_seconds(),
        )?;
        let rate_window = match Duration::try_seconds(window_secs) {
            Some(window) if window_secs > 0 => window,
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: "MASTERBLOG_RATE_WINDOW_SECS",
                    value: window_secs.to_string(),
                    reason: "window must be a positive number of seconds in range".to_string(),
                })
            }
        };

        Ok(Config {
            host: lookup("MASTERBLOG_HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "MASTERBLOG_PORT", defaults.port)?,
            rate_limit,
            rate_window,
        })
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: ToString,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(ConfigError::InvalidValue {
                key,
                reason: e.to_string(),
                value,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.socket_addr(), "0.0.0.0:5002");
        assert_eq!(config.rate_limit, 100);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("MASTERBLOG_HOST", "127.0.0.1"),
            ("MASTERBLOG_PORT", "8080"),
            ("MASTERBLOG_RATE_LIMIT", "5"),
        ]))
        .unwrap();
        assert_eq!(config.socket_addr(), "127.0.0.1:8080");
        assert_eq!(config.rate_limit, 5);
        assert_eq!(config.rate_window, Duration::seconds(60));
    }

    #[test]
    fn test_malformed_port() {
        let err = Config::from_lookup(lookup(&[("MASTERBLOG_PORT", "http")])).unwrap_err();
        match err {
            ConfigError::InvalidValue { key, value, .. } => {
                assert_eq!(key, "MASTERBLOG_PORT");
                assert_eq!(value, "http");
            }
        }
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(Config::from_lookup(lookup(&[("MASTERBLOG_RATE_WINDOW_SECS", "0")])).is_err());
    }

    #[test]
    fn test_out_of_range_window_rejected() {
        let err = Config::from_lookup(lookup(&[(
            "MASTERBLOG_RATE_WINDOW_SECS",
            "9223372036854775807",
        )]))
        .unwrap_err();
        match err {
            ConfigError::InvalidValue { key, .. } => {
                assert_eq!(key, "MASTERBLOG_RATE_WINDOW_SECS")
            }
        }
    }

    #[test]
    fn test_large_window_accepted() {
        let config =
            Config::from_lookup(lookup(&[("MASTERBLOG_RATE_WINDOW_SECS", "86400")])).unwrap();
        assert_eq!(config.rate_window, Duration::days(1));
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        let err = Config::from_lookup(lookup(&[("MASTERBLOG_RATE_LIMIT", "0")])).unwrap_err();
        match err {
            ConfigError::InvalidValue { key, value, .. } => {
                assert_eq!(key, "MASTERBLOG_RATE_LIMIT");
                assert_eq!(value, "0");
            }
        }
    }
}
