//! Pota: command-line interpreter.

use std::process::ExitCode;

use clap::Parser;
use pota_cli::colors::{error_label, warning_label};
use pota_cli::{
    load_config, load_source, trace_writer, Cli, CliError, RunOptions, TerminalConsole,
    FAULT_LEAD_IN,
};
use pota_vm::{Console, DebugFilter, RunOutcome, VmError};
use tracing::debug;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };
    pota_cli::init_logging();

    // Outside raw key reads Ctrl-C is a signal; end quietly like a finished run.
    if let Err(e) = ctrlc::set_handler(|| std::process::exit(0)) {
        eprintln!("{} cannot install Ctrl-C handler: {}", warning_label(), e);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", error_label(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let options = RunOptions::resolve(cli, &config.run)?;
    let source = load_source(cli)?;

    let mut interp = options.interpreter(&source);
    if options.debug != DebugFilter::Off {
        interp = interp.with_debug_callback(trace_writer(std::io::stderr()));
    }
    debug!(pacing = ?options.pacing, "starting run");

    let mut console = TerminalConsole::new();
    match interp.run(&mut console) {
        Ok(RunOutcome::Finished) => console.write_text("\n").map_err(VmError::from)?,
        Ok(RunOutcome::Interrupted) => debug!("run interrupted"),
        Err(VmError::Fault(fault)) => {
            debug!(kind = %fault.kind(), rounds = interp.rounds(), "program fault");
            eprintln!("{} {}", FAULT_LEAD_IN, fault);
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
