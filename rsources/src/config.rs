//! Service configuration.
//!
//! Settings come from an optional JSON file named by `RSOURCES_CONFIG`,
//! then individual `RSOURCES_*` environment variables override fields.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::observability::{LogFormat, LogSettings};

/// Environment variable naming the JSON settings file.
pub const CONFIG_PATH_ENV: &str = "RSOURCES_CONFIG";

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// The file path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON for [`Settings`].
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// The file path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidEnv {
        /// The variable name.
        key: String,
        /// The raw value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A setting is out of range.
    #[error("invalid setting {field}: {reason}")]
    Invalid {
        /// The setting name.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Settings of the job-status service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Address the HTTP server binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    /// Upper bound for a single store call, in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Runs not updated for this many hours are purged.
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u64,
    /// Seconds between retention sweeps.
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
    /// Logging settings.
    #[serde(default)]
    pub log: LogSettings,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

const fn default_request_timeout_ms() -> u64 {
    30_000
}

const fn default_retention_hours() -> u64 {
    7 * 24
}

const fn default_cleanup_interval_secs() -> u64 {
    3600
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            request_timeout_ms: default_request_timeout_ms(),
            retention_hours: default_retention_hours(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
            log: LogSettings::default(),
        }
    }
}

impl Settings {
    /// Loads settings from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Loads settings using `lookup` to read environment variables.
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match lookup(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        settings.apply_env(lookup)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from a JSON file. Missing fields take defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = parse_env(&lookup, "RSOURCES_LISTEN_ADDR")? {
            self.listen_addr = addr;
        }
        if let Some(ms) = parse_env(&lookup, "RSOURCES_REQUEST_TIMEOUT_MS")? {
            self.request_timeout_ms = ms;
        }
        if let Some(hours) = parse_env(&lookup, "RSOURCES_RETENTION_HOURS")? {
            self.retention_hours = hours;
        }
        if let Some(secs) = parse_env(&lookup, "RSOURCES_CLEANUP_INTERVAL_SECS")? {
            self.cleanup_interval_secs = secs;
        }
        if let Some(level) = lookup("RSOURCES_LOG_LEVEL") {
            self.log.level = level;
        }
        if let Some(format) = parse_env::<LogFormat, _>(&lookup, "RSOURCES_LOG_FORMAT")? {
            self.log.format = format;
        }
        Ok(())
    }

    /// Rejects settings the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "request_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.cleanup_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "cleanup_interval_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the store call timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Returns the retention window.
    #[must_use]
    pub const fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_hours.saturating_mul(3600))
    }

    /// Returns the interval between retention sweeps.
    #[must_use]
    pub const fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

fn parse_env<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| {
            value.trim().parse::<T>().map_err(|err: T::Err| ConfigError::InvalidEnv {
                key: key.to_string(),
                value: value.clone(),
                reason: err.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load_with(env(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.listen_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
        assert_eq!(settings.retention(), Duration::from_secs(7 * 24 * 3600));
    }

    #[test]
    fn test_env_overrides() {
        let settings = Settings::load_with(env(&[
            ("RSOURCES_LISTEN_ADDR", "0.0.0.0:9000"),
            ("RSOURCES_REQUEST_TIMEOUT_MS", "1500"),
            ("RSOURCES_RETENTION_HOURS", "1"),
            ("RSOURCES_CLEANUP_INTERVAL_SECS", "60"),
            ("RSOURCES_LOG_LEVEL", "debug"),
            ("RSOURCES_LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(settings.listen_addr.port(), 9000);
        assert_eq!(settings.request_timeout(), Duration::from_millis(1500));
        assert_eq!(settings.retention(), Duration::from_secs(3600));
        assert_eq!(settings.cleanup_interval(), Duration::from_secs(60));
        assert_eq!(settings.log.level, "debug");
        assert_eq!(settings.log.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_env_value() {
        let err = Settings::load_with(env(&[("RSOURCES_REQUEST_TIMEOUT_MS", "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { ref key, .. } if key == "RSOURCES_REQUEST_TIMEOUT_MS"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = Settings::load_with(env(&[("RSOURCES_REQUEST_TIMEOUT_MS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "request_timeout_ms", .. }));
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"retention_hours": 2, "log": {"format": "json"}}"#).unwrap();
        assert_eq!(settings.retention_hours, 2);
        assert_eq!(settings.request_timeout_ms, 30_000);
        assert_eq!(settings.log.format, LogFormat::Json);
        assert_eq!(settings.log.level, "info");
    }

    #[test]
    fn test_missing_config_file() {
        let err = Settings::load_with(env(&[(CONFIG_PATH_ENV, "/nonexistent/rsources.json")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
