//! Benchmark suite for the Pota interpreter.
//!
//! Measures grid parsing, free-running execution and the per-round overhead
//! of paced scheduling.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pota_core::Grid;
use pota_vm::{BufferedConsole, Interpreter, Pacing};

// ---------------------------------------------------------------------------
// Benchmark programs (inline source)
// ---------------------------------------------------------------------------

/// Decrement the top of the stack until it reaches zero.
const COUNTDOWN: &str = "1-,?;";

/// Print each character of a greeting through a nested stack.
const GREETING: &str = "\"hello, world\"er:o;";

fn wide_program() -> String {
    let row = "1+".repeat(200);
    let mut source = String::new();
    for _ in 0..200 {
        source.push_str(&row);
        source.push('\n');
    }
    source
}

fn bench_parse_wide(c: &mut Criterion) {
    let source = wide_program();
    c.bench_function("parse_wide", |b| b.iter(|| Grid::parse(black_box(&source))));
}

fn bench_countdown_free_running(c: &mut Criterion) {
    let grid = Grid::parse(COUNTDOWN);
    c.bench_function("countdown_free_running", |b| {
        b.iter(|| {
            let mut interp = Interpreter::new(grid.clone(), ["1000"]);
            let mut console = BufferedConsole::new();
            interp.run(black_box(&mut console)).unwrap();
        })
    });
}

fn bench_countdown_paced(c: &mut Criterion) {
    let grid = Grid::parse(COUNTDOWN);
    c.bench_function("countdown_paced", |b| {
        b.iter(|| {
            let mut interp = Interpreter::new(grid.clone(), ["1000"]).with_pacing(Pacing::Manual);
            let mut console = BufferedConsole::new();
            interp.run(black_box(&mut console)).unwrap();
        })
    });
}

fn bench_greeting(c: &mut Criterion) {
    let grid = Grid::parse(GREETING);
    c.bench_function("greeting", |b| {
        b.iter(|| {
            let mut interp = Interpreter::new(grid.clone(), Vec::<String>::new());
            let mut console = BufferedConsole::new();
            interp.run(&mut console).unwrap();
            black_box(console.output().len())
        })
    });
}

criterion_group!(
    benches,
    bench_parse_wide,
    bench_countdown_free_running,
    bench_countdown_paced,
    bench_greeting
);
criterion_main!(benches);
