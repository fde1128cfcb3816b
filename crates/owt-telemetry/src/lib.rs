//! Logging setup for the OWT service
//!
//! Installs one `tracing` subscriber with a console sink and two optional
//! rolling file sinks: a service log that receives everything at the
//! configured level, and an exception log that receives `WARN` and above.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use owt_telemetry::TelemetryConfig;
//!
//! let _guard = TelemetryConfig::builder()
//!     .service_name("owt-service")
//!     .service_log_dir("logs/service")
//!     .exception_log_dir("logs/exception")
//!     .build()
//!     .init()?;
//! ```

mod config;
mod error;
mod init;

pub use config::{LogRotation, TelemetryConfig, TelemetryConfigBuilder};
pub use error::{TelemetryError, TelemetryResult};
pub use init::TelemetryGuard;
