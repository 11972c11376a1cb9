//! Admission Gate
//!
//! Decides whether an actor may enter the access protocol at all.
//!
//! ## Rule
//!
//! The expected credential is the registry credential at
//! `slot_for(role, identity)`. Admission succeeds iff the presented credential
//! equals it. The comparison is role-scoped: a credential that is valid for
//! the other role is still rejected.
//!
//! The gate is a pure function of the registry and the actor, so every actor
//! thread can call it concurrently through a shared reference.

use std::sync::Arc;

use crate::{
    actor::Actor,
    credential::{Credential, CredentialRegistry, Role},
    error::AdmissionError,
};

/// Credential check in front of the coordinator.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    registry: Arc<CredentialRegistry>,
}

impl AdmissionGate {
    /// Create a gate over a populated registry.
    pub fn new(registry: Arc<CredentialRegistry>) -> Self {
        Self { registry }
    }

    /// The registry backing this gate.
    pub fn registry(&self) -> &CredentialRegistry {
        &self.registry
    }

    /// Credential an actor with this role and identity must present.
    ///
    /// Exposed for audit and diagnostics. `None` if the role has no slots,
    /// in which case no actor of that role can be admitted.
    pub fn expected_for(&self, role: Role, identity: u32) -> Option<Credential> {
        let slot = self.registry.slot_for(role, identity)?;
        self.registry.lookup(role, slot)
    }

    /// Check an actor's credential.
    ///
    /// # Errors
    ///
    /// `AdmissionError::Rejected` carrying both the presented and expected
    /// credential.
    pub fn check(&self, actor: &Actor) -> Result<(), AdmissionError> {
        let expected = self.expected_for(actor.role, actor.identity);
        if expected == Some(actor.credential) {
            return Ok(());
        }

        Err(AdmissionError::Rejected {
            identity: actor.identity,
            role: actor.role,
            presented: actor.credential,
            expected,
        })
    }

    /// True iff the actor presents the expected credential.
    pub fn admit(&self, actor: &Actor) -> bool {
        self.check(actor).is_ok()
    }
}
