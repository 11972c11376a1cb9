//! Real-coordinator side of model-based testing.

use std::collections::HashMap;

use turnstile_core::{Coordinator, ReadGuard, WriteGuard};

use crate::model::{HolderId, Operation, OperationError, OperationResult};

/// A guard owned by one holder.
enum Held<'a> {
    Reader(ReadGuard<'a>),
    Writer(WriteGuard<'a>),
}

/// Applies model operations to a real coordinator.
///
/// Mirrors [`ModelResource::apply`](crate::ModelResource::apply) using the non-blocking entry points, so a
/// single thread can drive any interleaving of holders.
pub struct CoordinatorDriver<'a> {
    coordinator: &'a Coordinator,
    held: HashMap<HolderId, Held<'a>>,
}

impl<'a> CoordinatorDriver<'a> {
    /// Drive `coordinator` with no guards held.
    pub fn new(coordinator: &'a Coordinator) -> Self {
        Self { coordinator, held: HashMap::new() }
    }

    /// Apply an operation and return the result.
    pub fn apply(&mut self, op: &Operation) -> OperationResult {
        match *op {
            Operation::EnterRead { holder } => {
                if self.held.contains_key(&holder) {
                    return OperationResult::Error(OperationError::AlreadyHolding);
                }
                match self.coordinator.try_enter_read() {
                    Some(guard) => {
                        self.held.insert(holder, Held::Reader(guard));
                        OperationResult::Ok
                    },
                    None => OperationResult::Error(OperationError::WouldBlock),
                }
            },
            Operation::EnterWrite { holder } => {
                if self.held.contains_key(&holder) {
                    return OperationResult::Error(OperationError::AlreadyHolding);
                }
                match self.coordinator.try_enter_write() {
                    Some(guard) => {
                        self.held.insert(holder, Held::Writer(guard));
                        OperationResult::Ok
                    },
                    None => OperationResult::Error(OperationError::WouldBlock),
                }
            },
            Operation::ExitRead { holder } => match self.held.remove(&holder) {
                Some(Held::Reader(guard)) => {
                    drop(guard);
                    OperationResult::Ok
                },
                Some(other) => {
                    self.held.insert(holder, other);
                    OperationResult::Error(OperationError::NotHolding)
                },
                None => OperationResult::Error(OperationError::NotHolding),
            },
            Operation::ExitWrite { holder } => match self.held.remove(&holder) {
                Some(Held::Writer(guard)) => {
                    drop(guard);
                    OperationResult::Ok
                },
                Some(other) => {
                    self.held.insert(holder, other);
                    OperationResult::Error(OperationError::NotHolding)
                },
                None => OperationResult::Error(OperationError::NotHolding),
            },
            Operation::Write { holder, value } => match self.held.get_mut(&holder) {
                Some(Held::Writer(guard)) => {
                    guard.set(u32::from(value));
                    OperationResult::Ok
                },
                _ => OperationResult::Error(OperationError::NotHolding),
            },
            Operation::Observe { holder } => match self.held.get(&holder) {
                Some(Held::Reader(guard)) => OperationResult::Observed(guard.value()),
                Some(Held::Writer(guard)) => OperationResult::Observed(guard.value()),
                None => OperationResult::Error(OperationError::NotHolding),
            },
        }
    }

    /// Drop every outstanding guard.
    pub fn release_all(&mut self) {
        self.held.clear();
    }
}
