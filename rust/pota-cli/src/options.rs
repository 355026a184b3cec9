//! Run settings merged from the command line and `pota.toml`.

use std::time::Duration;

use pota_core::Grid;
use pota_vm::{DebugFilter, Interpreter, Pacing};

use crate::cli::Cli;
use crate::config::{ConfigError, RunSection};

#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub stack: Vec<String>,
    pub debug: DebugFilter,
    pub pacing: Pacing,
    pub seed: Option<u64>,
}

impl RunOptions {
    /// Command-line flags win over the config file.
    pub fn resolve(cli: &Cli, config: &RunSection) -> Result<Self, ConfigError> {
        let stack = cli
            .stack
            .clone()
            .or_else(|| config.stack.clone())
            .unwrap_or_default();
        let debug = match (&cli.debug, &config.debug) {
            (Some(ids), _) if ids.is_empty() => DebugFilter::All,
            (Some(ids), _) => DebugFilter::Only(ids.iter().copied().collect()),
            (None, Some(setting)) => setting.to_filter()?,
            (None, None) => DebugFilter::Off,
        };
        Ok(Self {
            stack,
            debug,
            pacing: pacing_from_tick(cli.tick.or(config.tick))?,
            seed: cli.seed.or(config.seed),
        })
    }

    pub fn interpreter(&self, source: &str) -> Interpreter {
        let interp = Interpreter::new(Grid::parse(source), self.stack.iter().map(String::as_str))
            .with_pacing(self.pacing)
            .with_debug_filter(self.debug.clone());
        match self.seed {
            Some(seed) => interp.with_seed(seed),
            None => interp,
        }
    }
}

/// No tick runs free; a negative tick waits for a cue; anything else is the
/// minimum spacing between rounds.
pub fn pacing_from_tick(tick: Option<f64>) -> Result<Pacing, ConfigError> {
    match tick {
        None => Ok(Pacing::FreeRunning),
        Some(t) if !t.is_finite() => Err(ConfigError::InvalidTick(t)),
        Some(t) if t < 0.0 => Ok(Pacing::Manual),
        Some(t) => Duration::try_from_secs_f64(t)
            .map(Pacing::Interval)
            .map_err(|_| ConfigError::InvalidTick(t)),
    }
}
