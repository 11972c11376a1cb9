//! Core error types.

use thiserror::Error;

use crate::credential::{Credential, Role};

/// Admission failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// Presented credential does not match the expected credential for the
    /// actor's role and identity.
    #[error("{role} {identity} rejected: presented {presented}, expected {}", display_expected(.expected.as_ref()))]
    Rejected {
        /// Identity of the rejected actor.
        identity: u32,
        /// Role the actor claimed.
        role: Role,
        /// Credential the actor presented.
        presented: Credential,
        /// Credential the registry holds for that role and identity.
        /// `None` when the role has no credential slots.
        expected: Option<Credential>,
    },
}

fn display_expected(expected: Option<&Credential>) -> String {
    expected.map_or_else(|| "none".to_string(), ToString::to_string)
}

/// Errors from credential registry construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Pool cannot hold one credential per role slot.
    #[error("credential pool too small: {pool_size} slots for {required} actors")]
    PoolTooSmall {
        /// Requested pool size.
        pool_size: usize,
        /// Slots needed (readers + writers).
        required: usize,
    },

    /// Pool would exhaust the credential space, leaving nothing to mint
    /// impostor credentials from.
    #[error("credential pool too large: {pool_size} slots, at most {max} allowed")]
    PoolTooLarge {
        /// Requested pool size.
        pool_size: usize,
        /// Largest accepted pool size.
        max: usize,
    },

    /// The random source kept repeating values already in use.
    #[error("entropy exhausted: no unused credential after {attempts} draws")]
    EntropyExhausted {
        /// Draws spent on the value that was never found.
        attempts: usize,
    },
}

/// Invalid transitions of the access state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// A writer holds exclusion.
    #[error("writer active")]
    WriterActive,

    /// The reader cohort holds exclusion.
    #[error("{0} readers active")]
    ReadersActive(u32),

    /// The reader cohort cannot count another member.
    #[error("reader limit reached")]
    ReaderLimit,

    /// Reader exit without a matching entry.
    #[error("no active reader to exit")]
    NoActiveReader,

    /// Writer exit without a matching entry.
    #[error("no active writer to exit")]
    NoActiveWriter,
}
