//! Command-line interface for owt-server

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::ServiceConfig;
use crate::error::ServerResult;
use crate::server;

/// owt-server - issue and validate OWTs behind an origin gate
#[derive(Parser, Debug)]
#[command(name = "owt-server", version, about, author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file (environment `OWT__*` variables still apply)
    #[arg(short, long, env = "OWT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Override `server.bind`
    #[arg(long, global = true)]
    pub bind: Option<String>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run the service
    Serve,
    /// Load and validate the configuration, then print it
    CheckConfig,
}

impl Cli {
    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Returns a [`ServerError`](crate::ServerError) if the configuration is
    /// invalid or the service fails.
    pub async fn execute(self) -> ServerResult<()> {
        let config = self.load_config()?;

        match self.command {
            Command::CheckConfig => {
                println!("{}", serde_json::to_string_pretty(&config)?);
                Ok(())
            }
            Command::Serve => {
                let _telemetry = config.telemetry_config(self.log_level()).init()?;
                info!(config = ?self.config, "Configuration loaded");
                server::serve(&config).await
            }
        }
    }

    /// Layered configuration with CLI overrides, validated
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or validation fails.
    pub fn load_config(&self) -> ServerResult<ServiceConfig> {
        let mut config = ServiceConfig::load(self.config.as_deref())?;
        if let Some(bind) = &self.bind {
            config.server.bind.clone_from(bind);
        }
        config.validate()?;
        Ok(config)
    }

    /// Level implied by `-v`/`-q`, if any
    pub fn log_level(&self) -> Option<&'static str> {
        if self.quiet {
            return Some("error");
        }
        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}
