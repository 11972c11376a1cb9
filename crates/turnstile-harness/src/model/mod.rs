//! Reference model for model-based testing.
//!
//! The model is a deliberately naive implementation of the readers-writers
//! protocol: a set of reader holders and an optional writer holder, with no
//! locks and no threads. It serves as the oracle against which the real
//! `Coordinator` is verified.
//!
//! # Design Principles
//!
//! - Simplicity: The model should be obviously correct
//! - Protocol not mechanism: Captures who may hold access, not how waiting
//!   works (entries that would block are reported as `WouldBlock`)
//! - Deterministic: Same inputs produce same outputs

pub mod operation;
mod resource;

pub use operation::{HolderId, Operation, OperationError, OperationResult};
pub use resource::ModelResource;
