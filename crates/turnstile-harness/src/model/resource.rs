//! Model shared resource.
//!
//! Tracks which holders are inside and what the buffer holds. No locks, no
//! waiting: an entry that the real coordinator would block on is simply
//! refused with `WouldBlock`.

use std::collections::BTreeSet;

use turnstile_core::AccessState;

use super::operation::{HolderId, Operation, OperationError, OperationResult};

/// Model of the shared buffer and its holders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelResource {
    /// Holders in the reader cohort.
    readers: BTreeSet<HolderId>,
    /// Holder with exclusive access.
    writer: Option<HolderId>,
    /// Buffer value.
    value: u32,
}

impl ModelResource {
    /// Create an idle resource holding `initial`.
    pub fn new(initial: u32) -> Self {
        Self { readers: BTreeSet::new(), writer: None, value: initial }
    }

    /// Access state the real coordinator should report.
    pub fn access_state(&self) -> AccessState {
        match (self.writer, self.readers.len()) {
            (Some(_), _) => AccessState::Writing,
            (None, 0) => AccessState::Idle,
            (None, n) => AccessState::Reading(u32::try_from(n).unwrap_or(u32::MAX)),
        }
    }

    /// Current buffer value.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// True if `holder` owns any guard.
    pub fn is_holding(&self, holder: HolderId) -> bool {
        self.readers.contains(&holder) || self.writer == Some(holder)
    }

    /// Apply an operation and return the result.
    ///
    /// This is the main entry point for model-based testing. The result
    /// should match the real implementation's result.
    pub fn apply(&mut self, op: &Operation) -> OperationResult {
        match *op {
            Operation::EnterRead { holder } => self.enter_read(holder),
            Operation::ExitRead { holder } => {
                if self.readers.remove(&holder) {
                    OperationResult::Ok
                } else {
                    OperationResult::Error(OperationError::NotHolding)
                }
            },
            Operation::EnterWrite { holder } => self.enter_write(holder),
            Operation::ExitWrite { holder } => {
                if self.writer == Some(holder) {
                    self.writer = None;
                    OperationResult::Ok
                } else {
                    OperationResult::Error(OperationError::NotHolding)
                }
            },
            Operation::Write { holder, value } => {
                if self.writer == Some(holder) {
                    self.value = u32::from(value);
                    OperationResult::Ok
                } else {
                    OperationResult::Error(OperationError::NotHolding)
                }
            },
            Operation::Observe { holder } => {
                if self.is_holding(holder) {
                    OperationResult::Observed(self.value)
                } else {
                    OperationResult::Error(OperationError::NotHolding)
                }
            },
        }
    }

    fn enter_read(&mut self, holder: HolderId) -> OperationResult {
        if self.is_holding(holder) {
            return OperationResult::Error(OperationError::AlreadyHolding);
        }
        if self.writer.is_some() {
            return OperationResult::Error(OperationError::WouldBlock);
        }
        self.readers.insert(holder);
        OperationResult::Ok
    }

    fn enter_write(&mut self, holder: HolderId) -> OperationResult {
        if self.is_holding(holder) {
            return OperationResult::Error(OperationError::AlreadyHolding);
        }
        if self.writer.is_some() || !self.readers.is_empty() {
            return OperationResult::Error(OperationError::WouldBlock);
        }
        self.writer = Some(holder);
        OperationResult::Ok
    }
}
