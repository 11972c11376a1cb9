//! Actor Runner
//!
//! Drives one actor through its repetitions:
//!
//! ```text
//! repeat N:
//!   admission check ──rejected──▶ report Rejected, next repetition
//!         │
//!      admitted
//!         ▼
//!   enter_read / enter_write ─▶ hold ─▶ release ─▶ report ─▶ work delay
//! ```
//!
//! Admission is re-checked on every repetition, not once per actor.

use turnstile_core::{Actor, AdmissionError, AdmissionGate, Coordinator, Environment, Role};

use crate::{
    config::Timing,
    report::{AccessEvent, Outcome, Reporter},
};

/// Largest value a writer stores.
pub const WRITE_VALUE_MAX: u32 = 9_999;

/// Per-actor attempt counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActorTally {
    /// Repetitions that passed admission and accessed the buffer.
    pub admitted: u64,
    /// Repetitions rejected at the gate.
    pub rejected: u64,
}

impl ActorTally {
    /// Sum two tallies.
    pub fn merge(self, other: Self) -> Self {
        Self { admitted: self.admitted + other.admitted, rejected: self.rejected + other.rejected }
    }
}

/// Runs actors against a shared gate and coordinator.
///
/// One runner is shared by reference across all actor threads.
pub struct ActorRunner<'a, E, R: ?Sized> {
    gate: &'a AdmissionGate,
    coordinator: &'a Coordinator,
    env: E,
    reporter: &'a R,
    timing: Timing,
}

impl<'a, E, R> ActorRunner<'a, E, R>
where
    E: Environment,
    R: Reporter + ?Sized,
{
    /// Create a runner.
    pub fn new(
        gate: &'a AdmissionGate,
        coordinator: &'a Coordinator,
        env: E,
        reporter: &'a R,
        timing: Timing,
    ) -> Self {
        Self { gate, coordinator, env, reporter, timing }
    }

    /// Run `operations` repetitions for `actor`, reporting every attempt.
    pub fn run(&self, actor: &Actor, operations: u32) -> ActorTally {
        tracing::debug!(actor = %actor.label(), operations, "actor started");
        let mut tally = ActorTally::default();

        for _ in 0..operations {
            match self.gate.check(actor) {
                Ok(()) => {
                    let outcome = self.access(actor.role);
                    self.reporter.report(AccessEvent::new(actor, outcome));
                    tally.admitted += 1;
                    self.env.sleep(self.timing.work_delay);
                },
                Err(AdmissionError::Rejected { expected, .. }) => {
                    self.reporter.report(AccessEvent::new(actor, Outcome::Rejected { expected }));
                    tally.rejected += 1;
                },
            }
        }

        tracing::debug!(
            actor = %actor.label(),
            admitted = tally.admitted,
            rejected = tally.rejected,
            "actor finished"
        );
        tally
    }

    /// One coordinated access. Guards are released before returning.
    fn access(&self, role: Role) -> Outcome {
        match role {
            Role::Reader => {
                let guard = self.coordinator.enter_read();
                self.env.sleep(self.timing.hold);
                Outcome::Read { observed: guard.value() }
            },
            Role::Writer => {
                let mut guard = self.coordinator.enter_write();
                let value = self.env.random_in(0, WRITE_VALUE_MAX);
                guard.set(value);
                self.env.sleep(self.timing.hold);
                Outcome::Wrote { value }
            },
        }
    }
}
