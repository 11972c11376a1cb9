//! Credential-gated readers-writers coordination.
//!
//! Actors must present the credential registered for their role before they
//! may request access to the shared buffer. Admitted readers share the buffer;
//! admitted writers get it exclusively.
//!
//! ## Architecture
//!
//! ```text
//! turnstile-core
//!   ├─ CredentialRegistry  (role-ordered credential pool)
//!   ├─ AdmissionGate       (role-scoped credential check)
//!   ├─ AccessState         (pure readers-writers state machine)
//!   ├─ Coordinator         (buffer + counting lock + exclusion wait)
//!   └─ Environment         (time, randomness, blocking delay)
//! ```
//!
//! Everything here is free of thread spawning and output; the simulation
//! driver lives in `turnstile-sim`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod access;
pub mod actor;
pub mod admission;
pub mod coordinator;
pub mod credential;
pub mod env;
pub mod error;

#[cfg(test)]
mod testing;

pub use access::AccessState;
pub use actor::{Actor, Authenticity};
pub use admission::AdmissionGate;
pub use coordinator::{Coordinator, CoordinatorStats, ReadGuard, WriteGuard};
pub use credential::{
    CREDENTIAL_MAX, CREDENTIAL_MIN, CREDENTIAL_SPACE, Credential, CredentialRegistry, Role,
    RoleLayout, generate_credentials,
};
pub use env::Environment;
pub use error::{AdmissionError, RegistryError, TransitionError};
