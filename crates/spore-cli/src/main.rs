//! `life3d`: run a distributed 3D multi-species Game of Life.
//!
//! ```bash
//! # 100 generations of a 64³ grid at 30% density, split across 4 workers
//! life3d 100 64 0.3 42 --workers 4
//!
//! # per-generation timings on stderr
//! RUST_LOG=spore_engine=trace life3d 10 16 0.5 1 -p 2
//! ```
//!
//! Stdout carries one `<species> <peak population> <peak generation>`
//! line per species. Everything else goes to stderr.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use spore::engine::{SimConfig, Simulation};
use tracing_subscriber::EnvFilter;

/// Distributed multi-species 3D Game of Life
#[derive(Parser, Debug)]
#[command(name = "life3d", version, about, long_about = None)]
struct Cli {
    /// Number of generations to simulate
    gen_count: u32,

    /// Grid side; the grid holds N³ cells
    #[arg(value_name = "N")]
    side: usize,

    /// Initial probability that a cell is alive, in [0, 1]
    density: f32,

    /// Seed for the initial grid; negative values are accepted
    #[arg(allow_negative_numbers = true)]
    seed: i64,

    /// Number of workers
    #[arg(short = 'p', long, env = "SPORE_WORKERS", default_value_t = 1)]
    workers: usize,

    /// Compute threads per worker (default: split available cores)
    #[arg(short = 't', long, env = "SPORE_THREADS")]
    threads: Option<usize>,
}

impl Cli {
    fn config(&self) -> SimConfig {
        let config = SimConfig::new(self.gen_count, self.side, self.density, self.seed as u64)
            .with_workers(self.workers);
        match self.threads {
            Some(t) => config.with_threads(t),
            None => config,
        }
    }
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn usage_error(message: impl std::fmt::Display) -> ExitCode {
    eprintln!("error: {message}\n\n{}", Cli::command().render_usage());
    ExitCode::FAILURE
}

fn run(simulation: &Simulation) -> anyhow::Result<()> {
    let report = simulation.run().context("simulation failed")?;
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{}", report.peaks).context("writing results")?;
    stdout.flush().context("writing results")?;
    eprintln!("Took: {:.1}s", report.elapsed.as_secs_f64());
    tracing::debug!(
        mean_compute = ?report.metrics.mean_compute(),
        wait_fraction = report.metrics.wait_fraction(),
        "coordinator timings"
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => {
            // --help and --version
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };
    setup_logging();

    let simulation = match Simulation::new(cli.config()) {
        Ok(s) => s,
        Err(e) => return usage_error(e),
    };

    match run(&simulation) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
