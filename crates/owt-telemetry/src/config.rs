//! Telemetry configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Rotation period for the file sinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// New file every hour
    Hourly,
    /// New file every day
    #[default]
    Daily,
    /// Single file, never rotated
    Never,
}

/// Telemetry configuration
///
/// Use [`TelemetryConfigBuilder`] for ergonomic configuration construction.
///
/// # Example
///
/// ```rust
/// use owt_telemetry::TelemetryConfig;
///
/// let config = TelemetryConfig::builder()
///     .service_name("owt-service")
///     .log_level("info,owt::audit=info")
///     .service_log_dir("logs/service")
///     .exception_log_dir("logs/exception")
///     .build();
/// assert_eq!(config.service_name, "owt-service");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name, also the file prefix of both log sinks
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Log level filter (e.g. "info", "info,owt_auth=debug"); `RUST_LOG` wins
    pub log_level: String,
    /// Enable JSON-formatted log output
    pub json_logs: bool,
    /// Write console output to stderr instead of stdout
    pub stderr_output: bool,
    /// Directory receiving every event at the configured level
    pub service_log_dir: Option<PathBuf>,
    /// Directory receiving `WARN` and above only
    pub exception_log_dir: Option<PathBuf>,
    /// Rotation period of both file sinks
    pub rotation: LogRotation,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "owt-service".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            stderr_output: true,
            service_log_dir: None,
            exception_log_dir: None,
            rotation: LogRotation::Daily,
        }
    }
}

impl TelemetryConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> TelemetryConfigBuilder {
        TelemetryConfigBuilder::default()
    }

    /// Initialize telemetry with this configuration
    ///
    /// Returns a guard that flushes the file sinks on drop.
    ///
    /// # Errors
    ///
    /// See [`TelemetryGuard::init`](crate::TelemetryGuard::init).
    pub fn init(self) -> Result<crate::TelemetryGuard, crate::TelemetryError> {
        crate::TelemetryGuard::init(self)
    }

    /// Whether any file sink is configured
    #[must_use]
    pub fn has_file_sinks(&self) -> bool {
        self.service_log_dir.is_some() || self.exception_log_dir.is_some()
    }
}

/// Builder for [`TelemetryConfig`]
#[derive(Debug, Clone, Default)]
pub struct TelemetryConfigBuilder {
    service_name: Option<String>,
    service_version: Option<String>,
    log_level: Option<String>,
    json_logs: Option<bool>,
    stderr_output: Option<bool>,
    service_log_dir: Option<PathBuf>,
    exception_log_dir: Option<PathBuf>,
    rotation: Option<LogRotation>,
}

impl TelemetryConfigBuilder {
    /// Set the service name
    #[must_use]
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    /// Set the service version
    #[must_use]
    pub fn service_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = Some(version.into());
        self
    }

    /// Set the log level filter
    #[must_use]
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    /// Enable or disable JSON log output
    #[must_use]
    pub fn json_logs(mut self, enabled: bool) -> Self {
        self.json_logs = Some(enabled);
        self
    }

    /// Enable or disable stderr console output
    #[must_use]
    pub fn stderr_output(mut self, enabled: bool) -> Self {
        self.stderr_output = Some(enabled);
        self
    }

    /// Set the service log directory
    #[must_use]
    pub fn service_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.service_log_dir = Some(dir.into());
        self
    }

    /// Set the exception log directory
    #[must_use]
    pub fn exception_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.exception_log_dir = Some(dir.into());
        self
    }

    /// Set the rotation period
    #[must_use]
    pub fn rotation(mut self, rotation: LogRotation) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> TelemetryConfig {
        let defaults = TelemetryConfig::default();

        TelemetryConfig {
            service_name: self.service_name.unwrap_or(defaults.service_name),
            service_version: self.service_version.unwrap_or(defaults.service_version),
            log_level: self.log_level.unwrap_or(defaults.log_level),
            json_logs: self.json_logs.unwrap_or(defaults.json_logs),
            stderr_output: self.stderr_output.unwrap_or(defaults.stderr_output),
            service_log_dir: self.service_log_dir.or(defaults.service_log_dir),
            exception_log_dir: self.exception_log_dir.or(defaults.exception_log_dir),
            rotation: self.rotation.unwrap_or(defaults.rotation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "owt-service");
        assert_eq!(config.log_level, "info");
        assert!(!config.json_logs);
        assert!(!config.has_file_sinks());
        assert_eq!(config.rotation, LogRotation::Daily);
    }

    #[test]
    fn test_builder() {
        let config = TelemetryConfig::builder()
            .service_name("test-service")
            .log_level("debug")
            .json_logs(true)
            .exception_log_dir("/tmp/owt/exception")
            .rotation(LogRotation::Hourly)
            .build();

        assert_eq!(config.service_name, "test-service");
        assert_eq!(config.log_level, "debug");
        assert!(config.json_logs);
        assert!(config.has_file_sinks());
        assert_eq!(config.service_log_dir, None);
        assert_eq!(config.rotation, LogRotation::Hourly);
    }

    #[test]
    fn test_rotation_serde() {
        let rotation: LogRotation = serde_json::from_str("\"hourly\"").unwrap();
        assert_eq!(rotation, LogRotation::Hourly);
    }
}
