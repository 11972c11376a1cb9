//! Reporting of access attempts.
//!
//! Every admission check produces exactly one [`AccessEvent`]. Formatting is
//! left to the [`Reporter`]; the runner only builds structured events.

use std::fmt;

use parking_lot::Mutex;
use turnstile_core::{Actor, Authenticity, Credential, Role};

/// Result of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Admitted reader observed the buffer.
    Read {
        /// Value seen.
        observed: u32,
    },
    /// Admitted writer replaced the buffer.
    Wrote {
        /// Value stored.
        value: u32,
    },
    /// Credential check failed; the buffer was not touched.
    Rejected {
        /// Credential the gate expected, for audit.
        expected: Option<Credential>,
    },
}

impl Outcome {
    /// True for reads and writes.
    pub const fn is_admitted(&self) -> bool {
        !matches!(self, Self::Rejected { .. })
    }
}

/// Structured record of one admission check and its access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessEvent {
    /// Actor identity within its class.
    pub actor_id: u32,
    /// Claimed role.
    pub role: Role,
    /// How the actor's credential was issued.
    pub authenticity: Authenticity,
    /// Credential presented.
    pub presented: Credential,
    /// What happened.
    pub outcome: Outcome,
}

impl AccessEvent {
    /// Event for `actor` with the given outcome.
    pub fn new(actor: &Actor, outcome: Outcome) -> Self {
        Self {
            actor_id: actor.identity,
            role: actor.role,
            authenticity: actor.authenticity,
            presented: actor.credential,
            outcome,
        }
    }
}

/// Sink for access events. Called concurrently from every actor thread.
pub trait Reporter: Send + Sync {
    /// Record one event.
    fn report(&self, event: AccessEvent);
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn report(&self, event: AccessEvent) {
        (**self).report(event);
    }
}

/// Emits events as structured `tracing` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: AccessEvent) {
        let AccessEvent { actor_id, role, authenticity, presented, outcome } = event;
        match outcome {
            Outcome::Read { observed } => tracing::info!(
                %role, actor_id, %authenticity, %presented, observed,
                "read"
            ),
            Outcome::Wrote { value } => tracing::info!(
                %role, actor_id, %authenticity, %presented, value,
                "wrote"
            ),
            Outcome::Rejected { expected } => tracing::warn!(
                %role, actor_id, %authenticity, %presented,
                expected = expected.map(Credential::value),
                "access denied"
            ),
        }
    }
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<AccessEvent>>,
}

impl MemoryReporter {
    /// Create an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all events so far, in arrival order.
    pub fn events(&self) -> Vec<AccessEvent> {
        self.events.lock().clone()
    }

    /// True if nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, event: AccessEvent) {
        self.events.lock().push(event);
    }
}

/// Totals for a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Attempts that passed admission.
    pub admitted: u64,
    /// Attempts that failed admission.
    pub rejected: u64,
    /// Reader entries granted by the coordinator.
    pub reads: u64,
    /// Buffer mutations.
    pub writes: u64,
    /// Highest number of readers inside at once.
    pub max_concurrent_readers: u32,
    /// Buffer value at shutdown.
    pub final_value: u32,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "admitted={} rejected={} reads={} writes={} max_concurrent_readers={} final_value={}",
            self.admitted,
            self.rejected,
            self.reads,
            self.writes,
            self.max_concurrent_readers,
            self.final_value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader() -> Actor {
        Actor::new(2, Role::Reader, Credential::new(123_456), Authenticity::Genuine)
    }

    #[test]
    fn event_copies_actor_fields() {
        let event = AccessEvent::new(&reader(), Outcome::Read { observed: 9 });
        assert_eq!(event.actor_id, 2);
        assert_eq!(event.role, Role::Reader);
        assert_eq!(event.presented, Credential::new(123_456));
        assert!(event.outcome.is_admitted());
    }

    #[test]
    fn rejection_is_not_admitted() {
        let outcome = Outcome::Rejected { expected: Some(Credential::new(654_321)) };
        assert!(!outcome.is_admitted());
    }

    #[test]
    fn memory_reporter_collects_in_order() {
        let reporter = MemoryReporter::new();
        assert!(reporter.is_empty());

        reporter.report(AccessEvent::new(&reader(), Outcome::Read { observed: 1 }));
        reporter.report(AccessEvent::new(&reader(), Outcome::Read { observed: 2 }));

        let observed: Vec<_> = reporter.events().into_iter().map(|e| e.outcome).collect();
        assert_eq!(observed, vec![Outcome::Read { observed: 1 }, Outcome::Read { observed: 2 }]);
    }

    #[test]
    fn summary_display() {
        let summary = RunSummary {
            admitted: 25,
            rejected: 25,
            reads: 15,
            writes: 10,
            max_concurrent_readers: 3,
            final_value: 4821,
        };
        insta::assert_snapshot!(
            summary.to_string(),
            @"admitted=25 rejected=25 reads=15 writes=10 max_concurrent_readers=3 final_value=4821"
        );
    }
}
