//! Service configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `OWT__`-prefixed environment variables
//! (`OWT__TOKEN__TTL_MINUTES=30`, `OWT__ORIGIN__ALLOW="a|b"`).
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:8080"
//!
//! [token]
//! key_path = "keys/owt.pem"
//! ttl_minutes = 60
//! issuers = "svcA|svcB"
//! audiences = "appB"
//!
//! [origin]
//! allow = "client-one|corp.example.com"
//! block = ""
//! app_id = "owt-service"
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use owt_auth::{DelimitedList, OriginPolicy};
use owt_telemetry::{LogRotation, TelemetryConfig};
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "OWT";
/// Separator between prefix and nested keys
pub const ENV_SEPARATOR: &str = "__";

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerSection,
    pub token: TokenSection,
    pub origin: OriginSection,
    pub logging: LoggingSection,
}

/// `[server]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Listen address
    pub bind: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

/// `[token]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenSection {
    /// File holding the symmetric key material
    pub key_path: PathBuf,
    /// Token lifetime
    pub ttl_minutes: u64,
    /// Issuers the validator accepts (pipe-delimited)
    pub issuers: DelimitedList,
    /// Audiences the validator accepts (pipe-delimited)
    pub audiences: DelimitedList,
    /// Leeway on `exp`/`nbf`
    pub clock_skew_secs: u64,
}

impl Default for TokenSection {
    fn default() -> Self {
        Self {
            key_path: PathBuf::from("keys/owt.pem"),
            ttl_minutes: 60,
            issuers: DelimitedList::default(),
            audiences: DelimitedList::default(),
            clock_skew_secs: 0,
        }
    }
}

/// `[origin]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OriginSection {
    pub allow: DelimitedList,
    pub block: DelimitedList,
    /// Agent string treated as absent
    pub default_agent: String,
    /// Identity given to admitted callers
    pub app_id: String,
    pub dns_timeout_ms: u64,
    /// Honour `X-Forwarded-For`/`X-Real-IP` (only behind a trusted proxy)
    pub trust_forwarded_for: bool,
}

impl Default for OriginSection {
    fn default() -> Self {
        Self {
            allow: DelimitedList::default(),
            block: DelimitedList::default(),
            default_agent: String::new(),
            app_id: "owt-service".to_string(),
            dns_timeout_ms: 2000,
            trust_forwarded_for: false,
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub json: bool,
    pub service_log_dir: Option<PathBuf>,
    pub exception_log_dir: Option<PathBuf>,
    pub rotation: LogRotation,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            service_log_dir: Some(PathBuf::from("logs/service")),
            exception_log_dir: Some(PathBuf::from("logs/exception")),
            rotation: LogRotation::Daily,
        }
    }
}

impl ServiceConfig {
    /// Load defaults, then `file` (if given), then the environment
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::ConfigLoad`] if a source cannot be read or does
    /// not deserialize. The result is not yet validated.
    pub fn load(file: Option<&Path>) -> ServerResult<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Check the settings the service cannot start without
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Configuration`] naming the first offending key.
    pub fn validate(&self) -> ServerResult<()> {
        if self.token.key_path.as_os_str().is_empty() {
            return Err(ServerError::configuration_with_key(
                "key path must not be empty",
                "token.key_path",
            ));
        }
        if self.token.ttl_minutes == 0 {
            return Err(ServerError::configuration_with_key(
                "token lifetime must be positive",
                "token.ttl_minutes",
            ));
        }
        if self.token.issuers.is_empty() {
            return Err(ServerError::configuration_with_key(
                "at least one issuer is required",
                "token.issuers",
            ));
        }
        if self.token.audiences.is_empty() {
            return Err(ServerError::configuration_with_key(
                "at least one audience is required",
                "token.audiences",
            ));
        }
        if self.origin.app_id.trim().is_empty() {
            return Err(ServerError::configuration_with_key(
                "application id must not be empty",
                "origin.app_id",
            ));
        }
        self.bind_addr()?;
        Ok(())
    }

    /// Parsed listen address
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Configuration`] if `server.bind` does not parse.
    pub fn bind_addr(&self) -> ServerResult<SocketAddr> {
        self.server.bind.parse().map_err(|e| {
            ServerError::configuration_with_key(
                format!("invalid bind address '{}': {e}", self.server.bind),
                "server.bind",
            )
        })
    }

    /// Token lifetime
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token.ttl_minutes.saturating_mul(60))
    }

    /// Clock-skew leeway for the validator
    pub fn clock_skew(&self) -> Duration {
        Duration::from_secs(self.token.clock_skew_secs)
    }

    /// Upper bound on one reverse lookup
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.origin.dns_timeout_ms)
    }

    /// Origin policy built from the `[origin]` section
    pub fn origin_policy(&self) -> OriginPolicy {
        OriginPolicy::new(self.origin.allow.clone(), self.origin.block.clone())
            .with_default_agent(self.origin.default_agent.clone())
            .with_app_id(self.origin.app_id.clone())
    }

    /// Telemetry settings; `level_override` (from `-v`/`-q`) beats the file
    pub fn telemetry_config(&self, level_override: Option<&str>) -> TelemetryConfig {
        let mut builder = TelemetryConfig::builder()
            .service_name(self.origin.app_id.clone())
            .service_version(env!("CARGO_PKG_VERSION"))
            .log_level(level_override.unwrap_or(&self.logging.level))
            .json_logs(self.logging.json)
            .rotation(self.logging.rotation);

        if let Some(dir) = &self.logging.service_log_dir {
            builder = builder.service_log_dir(dir.clone());
        }
        if let Some(dir) = &self.logging.exception_log_dir {
            builder = builder.exception_log_dir(dir.clone());
        }
        builder.build()
    }
}
