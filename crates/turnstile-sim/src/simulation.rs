//! Simulation setup, thread-per-actor execution and shutdown.

use std::{sync::Arc, thread};

use turnstile_core::{Actor, AdmissionGate, Coordinator, CredentialRegistry, Environment, Role};

use crate::{
    config::SimulationConfig,
    error::SimError,
    report::{Reporter, RunSummary},
    runner::{ActorRunner, ActorTally},
};

/// One configured run of the simulation.
#[derive(Debug, Clone)]
pub struct Simulation<E> {
    config: SimulationConfig,
    env: E,
}

impl<E: Environment> Simulation<E> {
    /// Create a simulation. Nothing is allocated until [`Self::run`].
    pub fn new(config: SimulationConfig, env: E) -> Self {
        Self { config, env }
    }

    /// Generate credentials, start every actor, and wait for all of them.
    ///
    /// All actors are started before any is joined. The run finishes only
    /// when every actor, genuine or impostor, has completed its repetitions.
    ///
    /// # Errors
    ///
    /// - `Config` / `Registry` if setup fails; no actor runs
    /// - `Spawn` if the OS refuses a thread; actors already started still run
    ///   to completion before this returns
    /// - `ActorPanicked` if an actor thread panicked
    pub fn run<R: Reporter + ?Sized>(&self, reporter: &R) -> Result<RunSummary, SimError> {
        self.config.validate()?;

        let registry = Arc::new(CredentialRegistry::generate(
            &self.env,
            self.config.layout(),
            self.config.pool_size,
        )?);
        let gate = AdmissionGate::new(Arc::clone(&registry));
        let actors = self.cast(&registry)?;
        let coordinator = Coordinator::new(0);

        tracing::info!(
            readers = self.config.readers,
            writers = self.config.writers,
            operations = self.config.operations,
            actors = actors.len(),
            "simulation starting"
        );

        let runner =
            ActorRunner::new(&gate, &coordinator, self.env.clone(), reporter, self.config.timing);
        let tally = spawn_and_join(&runner, &actors, self.config.operations)?;

        let stats = coordinator.stats();
        let summary = RunSummary {
            admitted: tally.admitted,
            rejected: tally.rejected,
            reads: stats.reads,
            writes: stats.writes,
            max_concurrent_readers: stats.max_concurrent_readers,
            final_value: coordinator.into_value(),
        };

        tracing::info!(%summary, "simulation finished");
        Ok(summary)
    }

    /// Build genuine and impostor actors for every role slot.
    ///
    /// Order: genuine readers, genuine writers, impostor readers, impostor
    /// writers. Identities count from 0 within each group.
    fn cast(&self, registry: &CredentialRegistry) -> Result<Vec<Actor>, SimError> {
        let groups = [(Role::Reader, self.config.readers), (Role::Writer, self.config.writers)];
        let mut actors = Vec::with_capacity(self.config.actor_count());

        for (role, count) in groups {
            for identity in 0..count {
                let actor = Actor::genuine(registry, role, identity).ok_or_else(|| {
                    SimError::Config(format!("no credential slot for {role} {identity}"))
                })?;
                actors.push(actor);
            }
        }

        for (role, count) in groups {
            for identity in 0..count {
                actors.push(Actor::impostor(registry, &self.env, role, identity)?);
            }
        }

        Ok(actors)
    }
}

/// Start one named thread per actor, then join them all.
fn spawn_and_join<E, R>(
    runner: &ActorRunner<'_, E, R>,
    actors: &[Actor],
    operations: u32,
) -> Result<ActorTally, SimError>
where
    E: Environment,
    R: Reporter + ?Sized,
{
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(actors.len());

        for actor in actors {
            let handle = thread::Builder::new()
                .name(actor.label())
                .spawn_scoped(scope, move || runner.run(actor, operations))
                .map_err(|source| {
                    tracing::error!(actor = %actor.label(), %source, "failed to spawn actor");
                    SimError::Spawn { actor: actor.label(), source }
                })?;
            handles.push((actor, handle));
        }

        // Join every handle even after a panic; the first failure wins.
        let mut total = Ok(ActorTally::default());
        for (actor, handle) in handles {
            let joined = handle.join();
            total = match (total, joined) {
                (Ok(sum), Ok(tally)) => Ok(sum.merge(tally)),
                (Ok(_), Err(_)) => Err(SimError::ActorPanicked(actor.label())),
                (Err(err), _) => Err(err),
            };
        }
        total
    })
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use turnstile_core::RegistryError;

    use super::*;
    use crate::{config::Timing, report::MemoryReporter, system_env::SeededEnv};

    /// What `SystemEnv` degrades to when the OS entropy source fails.
    #[derive(Clone, Copy)]
    struct ZeroEntropy;

    impl Environment for ZeroEntropy {
        fn now(&self) -> Instant {
            Instant::now()
        }

        fn sleep(&self, _duration: Duration) {}

        fn random_bytes(&self, buffer: &mut [u8]) {
            buffer.fill(0);
        }
    }

    fn quick(readers: u32, writers: u32, operations: u32) -> SimulationConfig {
        SimulationConfig {
            readers,
            writers,
            operations,
            pool_size: (readers + writers) as usize,
            timing: Timing::instant(),
        }
    }

    #[test]
    fn cast_builds_equal_impostor_pool() {
        let sim = Simulation::new(quick(3, 2, 1), SeededEnv::new(4));
        let registry =
            CredentialRegistry::generate(&sim.env, sim.config.layout(), sim.config.pool_size)
                .unwrap();
        let actors = sim.cast(&registry).unwrap();

        assert_eq!(actors.len(), 10);
        let labels: Vec<_> = actors.iter().map(Actor::label).collect();
        assert_eq!(
            labels,
            vec![
                "reader-0",
                "reader-1",
                "reader-2",
                "writer-0",
                "writer-1",
                "impostor-reader-0",
                "impostor-reader-1",
                "impostor-reader-2",
                "impostor-writer-0",
                "impostor-writer-1",
            ]
        );
        for impostor in &actors[5..] {
            assert!(!registry.contains(impostor.credential));
        }
    }

    #[test]
    fn invalid_config_starts_nothing() {
        let mut config = quick(3, 2, 1);
        config.pool_size = 2;
        let reporter = MemoryReporter::new();

        let result = Simulation::new(config, SeededEnv::new(1)).run(&reporter);

        assert!(matches!(result, Err(SimError::Config(_))));
        assert!(reporter.is_empty());
    }

    #[test]
    fn empty_run_completes() {
        let reporter = MemoryReporter::new();
        let summary = Simulation::new(quick(0, 0, 5), SeededEnv::new(1)).run(&reporter).unwrap();

        assert_eq!(summary, RunSummary::default());
        assert!(reporter.is_empty());
    }

    #[test]
    fn failed_entropy_aborts_before_any_actor() {
        let reporter = MemoryReporter::new();

        let result = Simulation::new(quick(3, 2, 5), ZeroEntropy).run(&reporter);

        let err = result.unwrap_err();
        assert!(matches!(err, SimError::Registry(RegistryError::EntropyExhausted { .. })));
        assert!(err.is_setup());
        assert!(reporter.is_empty());
    }

    #[test]
    fn failed_entropy_with_single_credential_fails_impostor() {
        // One credential can be drawn, but its impostor never can.
        let result = Simulation::new(quick(1, 0, 1), ZeroEntropy).run(&MemoryReporter::new());

        assert!(matches!(
            result,
            Err(SimError::Registry(RegistryError::EntropyExhausted { .. }))
        ));
    }
}
