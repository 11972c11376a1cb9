//! Turnstile simulation binary.
//!
//! # Usage
//!
//! ```bash
//! # Three readers, two writers, five repetitions each (plus impostors)
//! turnstile-sim
//!
//! # Larger, faster, reproducible run
//! turnstile-sim --readers 8 --writers 3 --operations 20 --pool-size 16 \
//!     --work-delay-ms 10 --hold-ms 2 --seed 42
//! ```
//!
//! Exits with status 2 if the run is refused before any actor starts (bad
//! configuration, credential generation failure) and 1 if it fails later.

use std::{process::ExitCode, time::Duration};

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use turnstile_sim::{SeededEnv, Simulation, SimulationConfig, SystemEnv, Timing, TracingReporter};

/// Credential-gated readers-writers simulation
#[derive(Parser, Debug)]
#[command(name = "turnstile-sim")]
#[command(about = "Simulate credential-gated readers and writers contending for a shared buffer")]
#[command(version)]
struct Args {
    /// Genuine reader threads (matched by as many impostor readers)
    #[arg(short, long, default_value = "3")]
    readers: u32,

    /// Genuine writer threads (matched by as many impostor writers)
    #[arg(short, long, default_value = "2")]
    writers: u32,

    /// Repetitions per actor
    #[arg(short, long, default_value = "5")]
    operations: u32,

    /// Credentials generated (must cover readers + writers)
    #[arg(long, default_value = "10")]
    pool_size: usize,

    /// Simulated work after each admitted access, in milliseconds
    #[arg(long, default_value = "1000")]
    work_delay_ms: u64,

    /// Time each admitted access holds the buffer, in milliseconds
    #[arg(long, default_value = "0")]
    hold_ms: u64,

    /// Seed for reproducible credentials and written values
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Simulation settings selected on the command line.
    fn config(&self) -> SimulationConfig {
        SimulationConfig {
            readers: self.readers,
            writers: self.writers,
            operations: self.operations,
            pool_size: self.pool_size,
            timing: Timing {
                work_delay: Duration::from_millis(self.work_delay_ms),
                hold: Duration::from_millis(self.hold_ms),
            },
        }
    }
}

/// Exit status when the run was refused before any actor started.
const EXIT_SETUP: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_thread_names(true)).with(filter).init();

    let config = args.config();
    let result = match args.seed {
        Some(seed) => {
            tracing::info!(seed, "using seeded randomness");
            Simulation::new(config, SeededEnv::new(seed)).run(&TracingReporter)
        },
        None => Simulation::new(config, SystemEnv::new()).run(&TracingReporter),
    };

    match result {
        Ok(summary) => {
            tracing::info!(
                admitted = summary.admitted,
                rejected = summary.rejected,
                final_value = summary.final_value,
                "run complete"
            );
            ExitCode::SUCCESS
        },
        Err(err) if err.is_setup() => {
            tracing::error!(%err, "simulation not started");
            ExitCode::from(EXIT_SETUP)
        },
        Err(err) => {
            tracing::error!(%err, "simulation failed");
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_run() {
        let args = Args::try_parse_from(["turnstile-sim"]).unwrap();

        assert_eq!(args.config(), SimulationConfig::default());
        assert_eq!(args.seed, None);
    }

    #[test]
    fn flags_map_onto_config() {
        let args = Args::try_parse_from([
            "turnstile-sim",
            "-r",
            "8",
            "-w",
            "3",
            "-o",
            "20",
            "--pool-size",
            "16",
            "--work-delay-ms",
            "10",
            "--hold-ms",
            "2",
            "--seed",
            "42",
        ])
        .unwrap();

        assert_eq!(
            args.config(),
            SimulationConfig {
                readers: 8,
                writers: 3,
                operations: 20,
                pool_size: 16,
                timing: Timing {
                    work_delay: Duration::from_millis(10),
                    hold: Duration::from_millis(2),
                },
            }
        );
        assert_eq!(args.seed, Some(42));
    }

    #[test]
    fn rejects_negative_counts() {
        assert!(Args::try_parse_from(["turnstile-sim", "--readers", "-1"]).is_err());
    }
}
