//! Operations for model-based testing.
//!
//! Operations represent every way a holder can interact with the shared
//! resource. They are generated randomly by proptest (or by the fuzzer via
//! `Arbitrary`) and applied to both the model and the real coordinator.

use arbitrary::Arbitrary;

/// Holder identifier. Each holder owns at most one guard at a time.
pub type HolderId = u8;

/// Operations that can be applied to the shared resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum Operation {
    /// Holder tries to join the reader cohort without blocking.
    EnterRead {
        /// Holder performing the operation.
        holder: HolderId,
    },

    /// Holder leaves the reader cohort.
    ExitRead {
        /// Holder performing the operation.
        holder: HolderId,
    },

    /// Holder tries to take exclusive access without blocking.
    EnterWrite {
        /// Holder performing the operation.
        holder: HolderId,
    },

    /// Holder releases exclusive access.
    ExitWrite {
        /// Holder performing the operation.
        holder: HolderId,
    },

    /// Writer replaces the buffer value.
    Write {
        /// Holder performing the operation.
        holder: HolderId,
        /// New value.
        value: u16,
    },

    /// Any current holder observes the buffer value.
    Observe {
        /// Holder performing the operation.
        holder: HolderId,
    },
}

impl Operation {
    /// Holder targeted by this operation.
    pub fn holder(&self) -> HolderId {
        match *self {
            Self::EnterRead { holder }
            | Self::ExitRead { holder }
            | Self::EnterWrite { holder }
            | Self::ExitWrite { holder }
            | Self::Write { holder, .. }
            | Self::Observe { holder } => holder,
        }
    }

    /// Same operation retargeted to `holder mod holders`.
    pub fn clamp(self, holders: usize) -> Self {
        let holders = HolderId::try_from(holders.clamp(1, usize::from(HolderId::MAX))).unwrap_or(1);
        let holder = self.holder() % holders;
        match self {
            Self::EnterRead { .. } => Self::EnterRead { holder },
            Self::ExitRead { .. } => Self::ExitRead { holder },
            Self::EnterWrite { .. } => Self::EnterWrite { holder },
            Self::ExitWrite { .. } => Self::ExitWrite { holder },
            Self::Write { value, .. } => Self::Write { holder, value },
            Self::Observe { .. } => Self::Observe { holder },
        }
    }
}

/// Result of applying an operation.
///
/// Used to compare model and real system behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationResult {
    /// Operation succeeded.
    Ok,

    /// Observation succeeded with this buffer value.
    Observed(u32),

    /// Operation failed with expected error.
    Error(OperationError),
}

/// Expected errors that can occur during operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationError {
    /// Entry would have blocked on the current holders.
    WouldBlock,

    /// Holder does not hold the access the operation needs.
    NotHolding,

    /// Holder already holds a guard.
    AlreadyHolding,
}

impl OperationResult {
    /// Check if operation succeeded.
    pub fn is_ok(&self) -> bool {
        !self.is_err()
    }

    /// Check if operation failed.
    pub fn is_err(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}
