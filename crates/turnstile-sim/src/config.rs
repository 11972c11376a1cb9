//! Simulation configuration.

use std::time::Duration;

use turnstile_core::{CREDENTIAL_SPACE, RoleLayout};

use crate::error::SimError;

/// Simulated time spent per access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Delay after each admitted access, outside the lock.
    pub work_delay: Duration,
    /// Time an admitted actor holds its guard before releasing it.
    pub hold: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self { work_delay: Duration::from_secs(1), hold: Duration::ZERO }
    }
}

impl Timing {
    /// No delays at all. Used by tests.
    pub const fn instant() -> Self {
        Self { work_delay: Duration::ZERO, hold: Duration::ZERO }
    }
}

/// Startup configuration for one run.
///
/// Zero counts are valid: no actors of that kind run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Genuine readers (and as many impostor readers).
    pub readers: u32,
    /// Genuine writers (and as many impostor writers).
    pub writers: u32,
    /// Repetitions per actor.
    pub operations: u32,
    /// Credentials generated. Must cover `readers + writers` slots.
    pub pool_size: usize,
    /// Access and work delays.
    pub timing: Timing,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            readers: 3,
            writers: 2,
            operations: 5,
            pool_size: 10,
            timing: Timing::default(),
        }
    }
}

impl SimulationConfig {
    /// Credential slots assigned per role.
    pub fn layout(&self) -> RoleLayout {
        RoleLayout::new(self.readers as usize, self.writers as usize)
    }

    /// Total actor threads, impostors included.
    pub fn actor_count(&self) -> usize {
        2 * self.layout().total()
    }

    /// Check the configuration before any resource is allocated.
    pub fn validate(&self) -> Result<(), SimError> {
        let required = self.layout().total();
        if self.pool_size < required {
            return Err(SimError::Config(format!(
                "pool size {} cannot cover {} reader and {} writer slots",
                self.pool_size, self.readers, self.writers
            )));
        }
        if self.pool_size >= CREDENTIAL_SPACE {
            return Err(SimError::Config(format!(
                "pool size {} leaves no credential values for impostors (max {})",
                self.pool_size,
                CREDENTIAL_SPACE - 1
            )));
        }
        Ok(())
    }
}
