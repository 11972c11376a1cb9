//! Deterministic test harness for Turnstile.
//!
//! Seeded implementation of the `Environment` trait plus a reference model of
//! the readers-writers protocol.
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference implementation of the access
//! protocol. Operations are applied to both the model and the real
//! `Coordinator` through [`CoordinatorDriver`], and their results and access
//! states are compared.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod driver;
pub mod model;
pub mod sim_env;

pub use driver::CoordinatorDriver;
pub use model::{HolderId, ModelResource, Operation, OperationError, OperationResult};
pub use sim_env::SimEnv;
