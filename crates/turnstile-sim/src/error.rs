//! Simulation error types.

use thiserror::Error;
use turnstile_core::RegistryError;

/// Errors that abort a simulation run.
///
/// Admission rejections are not errors at this level: they are reported per
/// attempt and the actor carries on.
#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration rejected before any actor started.
    #[error("configuration error: {0}")]
    Config(String),

    /// Credential registry could not be built, or no impostor credential
    /// could be minted from it.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The OS refused to start an actor thread.
    #[error("failed to spawn {actor}: {source}")]
    Spawn {
        /// Label of the actor that could not start.
        actor: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// An actor thread panicked before finishing its repetitions.
    #[error("{0} panicked")]
    ActorPanicked(String),
}

impl SimError {
    /// Returns true if the run failed before any actor was started.
    pub fn is_setup(&self) -> bool {
        match self {
            Self::Config(_) | Self::Registry(_) => true,
            Self::Spawn { .. } | Self::ActorPanicked(_) => false,
        }
    }
}
