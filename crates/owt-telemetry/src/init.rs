//! Telemetry initialization
//!
//! One global subscriber with up to three sinks:
//!
//! | Sink          | Filter                           | Writer                  |
//! |---------------|----------------------------------|-------------------------|
//! | console       | `RUST_LOG` or configured level   | stderr / stdout         |
//! | service log   | `RUST_LOG` or configured level   | rolling file, non-blocking |
//! | exception log | `WARN` and above                 | rolling file, non-blocking |

use std::io;
use std::path::Path;

use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry, fmt};

use crate::{LogRotation, TelemetryConfig, TelemetryError};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Guard that flushes the file sinks on drop
///
/// **The guard must outlive all traced code.** Hold it in `main()` for the
/// lifetime of the server; dropping it early loses buffered log lines.
///
/// ```rust,ignore
/// let _telemetry = TelemetryConfig::default().init()?;
/// run_server().await?;
/// ```
pub struct TelemetryGuard {
    config: TelemetryConfig,
    file_guards: Vec<WorkerGuard>,
}

impl std::fmt::Debug for TelemetryGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryGuard")
            .field("config", &self.config)
            .field("file_sinks", &self.file_guards.len())
            .finish()
    }
}

impl TelemetryGuard {
    /// Initialize telemetry with the provided configuration
    ///
    /// # Errors
    ///
    /// - [`TelemetryError::InvalidConfiguration`] if the log level does not parse
    /// - [`TelemetryError::LogDirectory`] if a log directory cannot be created
    /// - [`TelemetryError::TracingError`] if a global subscriber is already set
    pub fn init(config: TelemetryConfig) -> Result<Self, TelemetryError> {
        let (layers, file_guards) = build_layers(&config)?;

        Registry::default()
            .with(layers)
            .try_init()
            .map_err(|e| TelemetryError::TracingError(e.to_string()))?;

        info!(
            service_name = %config.service_name,
            service_version = %config.service_version,
            json_logs = config.json_logs,
            service_log_dir = ?config.service_log_dir,
            exception_log_dir = ?config.exception_log_dir,
            "OWT telemetry initialized"
        );

        Ok(Self {
            config,
            file_guards,
        })
    }

    /// Get the service name
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.config.service_name
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        info!(
            service_name = %self.config.service_name,
            "Shutting down OWT telemetry"
        );
    }
}

/// Build the configured sinks without installing them
pub(crate) fn build_layers(
    config: &TelemetryConfig,
) -> Result<(Vec<BoxedLayer>, Vec<WorkerGuard>), TelemetryError> {
    let mut layers = Vec::new();
    let mut guards = Vec::new();

    let console = if config.stderr_output {
        console_layer(config, io::stderr)
    } else {
        console_layer(config, io::stdout)
    };
    layers.push(console.with_filter(env_filter(config)?).boxed());

    if let Some(dir) = &config.service_log_dir {
        let (layer, guard) = file_layer(config, dir, "service")?;
        layers.push(layer.with_filter(env_filter(config)?).boxed());
        guards.push(guard);
    }

    if let Some(dir) = &config.exception_log_dir {
        let (layer, guard) = file_layer(config, dir, "exception")?;
        layers.push(layer.with_filter(LevelFilter::WARN).boxed());
        guards.push(guard);
    }

    Ok((layers, guards))
}

fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::InvalidConfiguration(format!("Invalid log level: {e}")))
}

fn console_layer<W>(config: &TelemetryConfig, writer: W) -> BoxedLayer
where
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    if config.json_logs {
        fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .json()
            .boxed()
    } else {
        fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .boxed()
    }
}

fn file_layer(
    config: &TelemetryConfig,
    dir: &Path,
    kind: &str,
) -> Result<(BoxedLayer, WorkerGuard), TelemetryError> {
    std::fs::create_dir_all(dir).map_err(|source| TelemetryError::LogDirectory {
        path: dir.to_path_buf(),
        source,
    })?;

    let rotation = match config.rotation {
        LogRotation::Hourly => Rotation::HOURLY,
        LogRotation::Daily => Rotation::DAILY,
        LogRotation::Never => Rotation::NEVER,
    };
    let appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(format!("{}-{kind}", config.service_name))
        .filename_suffix("log")
        .build(dir)
        .map_err(|e| TelemetryError::InvalidConfiguration(format!("Cannot open {kind} log: {e}")))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    // Files are never colored, whatever the console does
    let layer = if config.json_logs {
        fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .json()
            .boxed()
    } else {
        fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .boxed()
    };

    Ok((layer, guard))
}
