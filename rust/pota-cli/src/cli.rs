//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

#[derive(Debug, Parser)]
#[command(
    name = "pota",
    version,
    about = "Pota interpreter",
    group(ArgGroup::new("source").required(true).args(["script", "code"]))
)]
pub struct Cli {
    /// .pota source file to execute
    #[arg(value_name = "SCRIPT")]
    pub script: Option<PathBuf>,

    /// String of Pota instructions to execute
    #[arg(short, long, value_name = "CODE")]
    pub code: Option<String>,

    /// Fill the stack before execution starts
    #[arg(short, long, num_args = 0.., value_name = "VAL", allow_negative_numbers = true)]
    pub stack: Option<Vec<String>>,

    /// Trace the pointers with these ids; with no ids, trace every pointer
    #[arg(short, long, num_args = 0.., value_name = "PTR")]
    pub debug: Option<Vec<u64>>,

    /// Wait at least TICK seconds between rounds; a negative TICK waits for Enter
    #[arg(short, long, value_name = "TICK", allow_negative_numbers = true)]
    pub tick: Option<f64>,

    /// Seed for the random mirror `x`
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Read settings from this file instead of searching for pota.toml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
