//! Process settings for the exporter.
//!
//! These are the knobs of the running service (where the threshold file
//! lives, where to listen, how often to poll), as opposed to the threshold
//! file itself.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::observability::logging::LogFormat;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("reload interval must be greater than zero")]
    ZeroReloadInterval,

    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,

    #[error("invalid listen address {0:?}")]
    InvalidListenAddress(String),
}

#[derive(Debug, Clone)]
pub struct ExporterSettings {
    /// Path to the threshold file.
    pub config_path: PathBuf,

    /// HTTP listen address (e.g., "0.0.0.0:8080").
    pub listen_address: String,

    /// Poll interval for config file changes, in seconds.
    pub reload_interval_secs: u64,

    /// Per-request timeout for the HTTP surface, in seconds.
    pub request_timeout_secs: u64,

    pub log_format: LogFormat,
}

impl Default for ExporterSettings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("/etc/threshold-exporter/config.yaml"),
            listen_address: "0.0.0.0:8080".to_string(),
            reload_interval_secs: 30,
            request_timeout_secs: 10,
            log_format: LogFormat::Pretty,
        }
    }
}

impl ExporterSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.reload_interval_secs == 0 {
            return Err(SettingsError::ZeroReloadInterval);
        }
        if self.request_timeout_secs == 0 {
            return Err(SettingsError::ZeroRequestTimeout);
        }
        self.listen_socket_addr()?;
        Ok(())
    }

    pub fn listen_socket_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.listen_address
            .parse()
            .map_err(|_| SettingsError::InvalidListenAddress(self.listen_address.clone()))
    }

    pub fn reload_interval(&self) -> Duration {
        Duration::from_secs(self.reload_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = ExporterSettings::default();
        assert_eq!(settings.validate(), Ok(()));
        assert_eq!(settings.reload_interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let settings = ExporterSettings {
            reload_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::ZeroReloadInterval));
    }

    #[test]
    fn test_rejects_bad_listen_address() {
        let settings = ExporterSettings {
            listen_address: ":8080".to_string(),
            ..Default::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::InvalidListenAddress(":8080".to_string()))
        );
    }

    #[test]
    fn test_rejects_zero_request_timeout() {
        let settings = ExporterSettings {
            request_timeout_secs: 0,
            log_format: LogFormat::Json,
            ..Default::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::ZeroRequestTimeout));
    }
}
