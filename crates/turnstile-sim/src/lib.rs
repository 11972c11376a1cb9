//! Turnstile simulation driver.
//!
//! Runs the credential-gated readers-writers protocol from `turnstile-core`
//! with one OS thread per actor:
//! - System time, OS entropy and real sleeps (`SystemEnv`)
//! - Or a seeded random stream for reproducible runs (`SeededEnv`)
//!
//! ## Architecture
//!
//! ```text
//! turnstile-sim
//!   ├─ SimulationConfig   (actor counts, repetitions, timing)
//!   ├─ Simulation         (registry setup, thread-per-actor run)
//!   ├─ ActorRunner        (admission -> coordinated access -> work delay)
//!   └─ Reporter           (structured per-attempt events)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod report;
mod runner;
mod simulation;
mod system_env;

pub use config::{SimulationConfig, Timing};
pub use error::SimError;
pub use report::{AccessEvent, MemoryReporter, Outcome, Reporter, RunSummary, TracingReporter};
pub use runner::{ActorRunner, ActorTally, WRITE_VALUE_MAX};
pub use simulation::Simulation;
pub use system_env::{SeededEnv, SystemEnv};
