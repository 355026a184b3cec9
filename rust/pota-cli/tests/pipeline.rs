//! Command line to finished run, without a terminal.

use std::cell::RefCell;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use pota_cli::config::ConfigError;
use pota_cli::{load_config, load_source, trace_writer, Cli, CliError, RunOptions};
use pota_vm::{BufferedConsole, Pacing, RunOutcome};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pota-cli-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Writer shared with the test body.
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn pipeline_inline_code_with_stack() {
    let cli = Cli::try_parse_from(["pota", "-c", ".o;", "-s", "foo", "bar"]).unwrap();
    let options = RunOptions::resolve(&cli, &Default::default()).unwrap();
    let source = load_source(&cli).unwrap();

    let mut console = BufferedConsole::new();
    let outcome = options.interpreter(&source).run(&mut console).unwrap();
    assert_eq!(outcome, RunOutcome::Finished);
    assert_eq!(console.output(), "foobar");
}

#[test]
fn pipeline_script_file_skips_directive_line() {
    let dir = scratch_dir("script");
    let script = dir.join("hello.pota");
    std::fs::write(&script, "#!/usr/bin/env pota\n\"hi\"o;\n").unwrap();

    let cli = Cli::try_parse_from(["pota".into(), script.clone().into_os_string()]).unwrap();
    let source = load_source(&cli).unwrap();
    let options = RunOptions::resolve(&cli, &Default::default()).unwrap();
    let mut console = BufferedConsole::new();
    options.interpreter(&source).run(&mut console).unwrap();
    assert_eq!(console.output(), "hi");

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn pipeline_missing_script_is_an_error() {
    let cli = Cli::try_parse_from(["pota", "/nonexistent/pota/script.pota"]).unwrap();
    let err = load_source(&cli).unwrap_err();
    assert!(matches!(err, CliError::ReadScript { .. }));
    assert!(err.to_string().contains("script.pota"));
}

#[test]
fn pipeline_explicit_config_file() {
    let dir = scratch_dir("config");
    let path = dir.join("custom.toml");
    std::fs::write(&path, "[run]\ntick = -1\nstack = [\"7\"]\n").unwrap();

    let cli = Cli::try_parse_from([
        "pota".into(),
        "-c".into(),
        "1+o;".into(),
        "--config".into(),
        path.clone().into_os_string(),
    ])
    .unwrap();
    let config = load_config(&cli).unwrap();
    let options = RunOptions::resolve(&cli, &config.run).unwrap();
    assert_eq!(options.pacing, Pacing::Manual);

    let mut console = BufferedConsole::new();
    let mut interp = options.interpreter(&load_source(&cli).unwrap());
    assert_eq!(interp.run(&mut console).unwrap(), RunOutcome::Finished);
    assert_eq!(console.output(), "8");
    // Seven single-step rounds, a cue between each pair.
    assert_eq!(console.cues(), 6);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn pipeline_unreadable_config_is_an_error() {
    let cli = Cli::try_parse_from(["pota", "-c", ";", "--config", "/nonexistent/pota.toml"])
        .unwrap();
    assert!(matches!(load_config(&cli), Err(ConfigError::Read { .. })));
}

#[test]
fn pipeline_debug_trace_stays_out_of_program_output() {
    let cli = Cli::try_parse_from(["pota", "-c", "\"A\"o;", "-d"]).unwrap();
    let options = RunOptions::resolve(&cli, &Default::default()).unwrap();
    let trace = SharedBuffer::default();

    let mut console = BufferedConsole::new();
    let mut interp = options
        .interpreter(&load_source(&cli).unwrap())
        .with_debug_callback(trace_writer(trace.clone()));
    assert_eq!(interp.run(&mut console).unwrap(), RunOutcome::Finished);
    assert_eq!(console.output(), "A");

    let trace = String::from_utf8(trace.0.borrow().clone()).unwrap();
    assert!(!trace.is_empty());
    assert!(trace.lines().all(|line| line.starts_with("[# Pointer  0")));
}
