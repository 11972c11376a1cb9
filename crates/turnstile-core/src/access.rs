//! Access state machine.
//!
//! Pure transitions of the shared resource's synchronization state, with no
//! threading. The [`Coordinator`](crate::coordinator::Coordinator) applies
//! these under its counting lock; tests and the reference model drive them
//! directly.
//!
//! ```text
//!            enter_read                 enter_read
//!   Idle ───────────────▶ Reading(1) ───────────────▶ Reading(n+1)
//!    ▲  ◀─────────────── (last out)  ◀─────────────── (n > 1)
//!    │       exit_read                  exit_read
//!    │
//!    │ enter_write / exit_write
//!    ▼
//!  Writing
//! ```
//!
//! # Invariants
//!
//! - A writer never coexists with active readers: they are distinct variants.
//! - Exclusion is held exactly when the state is not `Idle`, by the reader
//!   cohort in `Reading` and by the single writer in `Writing`.

use std::fmt;

use crate::error::TransitionError;

/// Synchronization state of the shared resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessState {
    /// Nobody holds exclusion.
    #[default]
    Idle,
    /// `n >= 1` readers are active; the cohort holds exclusion.
    Reading(u32),
    /// One writer holds exclusion.
    Writing,
}

impl AccessState {
    /// Admit one more reader.
    ///
    /// `Idle -> Reading(1)` is the first-reader transition that takes
    /// exclusion for the cohort. A full cohort refuses further readers
    /// rather than miscount them.
    pub fn enter_read(self) -> Result<Self, TransitionError> {
        match self {
            Self::Idle => Ok(Self::Reading(1)),
            Self::Reading(n) => {
                n.checked_add(1).map(Self::Reading).ok_or(TransitionError::ReaderLimit)
            },
            Self::Writing => Err(TransitionError::WriterActive),
        }
    }

    /// Release one reader.
    ///
    /// `Reading(1) -> Idle` is the last-reader transition that releases
    /// exclusion.
    pub fn exit_read(self) -> Result<Self, TransitionError> {
        match self {
            Self::Reading(1) => Ok(Self::Idle),
            Self::Reading(n) if n > 1 => Ok(Self::Reading(n - 1)),
            Self::Idle | Self::Reading(_) | Self::Writing => Err(TransitionError::NoActiveReader),
        }
    }

    /// Take exclusion for a writer. Only valid from `Idle`.
    pub fn enter_write(self) -> Result<Self, TransitionError> {
        match self {
            Self::Idle => Ok(Self::Writing),
            Self::Reading(n) => Err(TransitionError::ReadersActive(n)),
            Self::Writing => Err(TransitionError::WriterActive),
        }
    }

    /// Release the writer's exclusion.
    pub fn exit_write(self) -> Result<Self, TransitionError> {
        match self {
            Self::Writing => Ok(Self::Idle),
            Self::Idle | Self::Reading(_) => Err(TransitionError::NoActiveWriter),
        }
    }

    /// Number of active readers.
    pub const fn active_readers(self) -> u32 {
        match self {
            Self::Reading(n) => n,
            Self::Idle | Self::Writing => 0,
        }
    }

    /// True while a writer holds exclusion.
    pub const fn is_writing(self) -> bool {
        matches!(self, Self::Writing)
    }

    /// True while anyone (reader cohort or writer) holds exclusion.
    pub const fn exclusion_held(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl fmt::Display for AccessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Reading(n) => write!(f, "reading({n})"),
            Self::Writing => f.write_str("writing"),
        }
    }
}
