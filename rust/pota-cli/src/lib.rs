//! Pota CLI library.
//!
//! Argument parsing, `pota.toml` handling, the terminal console and logging
//! setup shared by the `pota` binary.

pub mod cli;
pub mod colors;
pub mod config;
pub mod options;
pub mod terminal;

use std::io::Write;
use std::path::PathBuf;

use pota_vm::{DebugCallback, DebugEvent, VmError};
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

pub use cli::Cli;
pub use config::{ConfigError, PotaConfig};
pub use options::RunOptions;
pub use terminal::TerminalConsole;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "POTA_LOG";

/// Lead-in of every fault report.
pub const FAULT_LEAD_IN: &str = "Pota!";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read file '{}': {source}", path.display())]
    ReadScript {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Vm(#[from] VmError),
}

/// Initialize logging to stderr.
///
/// `POTA_LOG` overrides the default `warn` filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Debug callback writing one trace line per event to `out`.
///
/// The binary passes stderr so traces never mix into program output.
pub fn trace_writer<W: Write + 'static>(mut out: W) -> DebugCallback {
    Some(Box::new(move |event: &DebugEvent| {
        let _ = writeln!(out, "{}", event);
    }))
}

/// Program text from the script file or the `-c` argument.
pub fn load_source(cli: &Cli) -> Result<String, CliError> {
    match (&cli.script, &cli.code) {
        (Some(path), _) => std::fs::read_to_string(path).map_err(|source| CliError::ReadScript {
            path: path.clone(),
            source,
        }),
        (None, Some(code)) => Ok(code.clone()),
        (None, None) => Ok(String::new()),
    }
}

/// Settings from `--config`, or from the nearest `pota.toml`.
pub fn load_config(cli: &Cli) -> Result<PotaConfig, ConfigError> {
    if let Some(path) = &cli.config {
        return PotaConfig::load_from(path);
    }
    match PotaConfig::discover()? {
        Some((path, cfg)) => {
            tracing::debug!(path = %path.display(), "loaded config");
            Ok(cfg)
        }
        None => Ok(PotaConfig::default()),
    }
}
