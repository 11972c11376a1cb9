//! Simulated actors.

use std::fmt;

use crate::{
    credential::{Credential, CredentialRegistry, Role},
    env::Environment,
    error::RegistryError,
};

/// Whether an actor was issued a genuine credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Authenticity {
    /// Holds the registry credential for its role and slot.
    Genuine,
    /// Holds a credential absent from the registry.
    Impostor,
}

impl fmt::Display for Authenticity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Genuine => f.write_str("genuine"),
            Self::Impostor => f.write_str("impostor"),
        }
    }
}

/// One participant in the simulation.
///
/// Immutable after construction. `identity` is unique within its
/// role and authenticity class only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// Identity within the role and authenticity class.
    pub identity: u32,
    /// Claimed role.
    pub role: Role,
    /// Credential presented at every admission check.
    pub credential: Credential,
    /// How the credential was issued.
    pub authenticity: Authenticity,
}

impl Actor {
    /// Actor presenting an arbitrary credential.
    ///
    /// Authenticity records how the credential was issued, not whether it
    /// will pass admission.
    pub const fn new(
        identity: u32,
        role: Role,
        credential: Credential,
        authenticity: Authenticity,
    ) -> Self {
        Self { identity, role, credential, authenticity }
    }

    /// Actor holding the registry credential for its role and identity.
    ///
    /// Returns `None` if the role has no credential slots.
    pub fn genuine(registry: &CredentialRegistry, role: Role, identity: u32) -> Option<Self> {
        let slot = registry.slot_for(role, identity)?;
        let credential = registry.lookup(role, slot)?;
        Some(Self::new(identity, role, credential, Authenticity::Genuine))
    }

    /// Actor holding a freshly minted credential absent from the registry.
    ///
    /// # Errors
    ///
    /// `EntropyExhausted` if no unused credential could be drawn.
    pub fn impostor<E: Environment>(
        registry: &CredentialRegistry,
        env: &E,
        role: Role,
        identity: u32,
    ) -> Result<Self, RegistryError> {
        let credential = registry.mint_impostor(env)?;
        Ok(Self::new(identity, role, credential, Authenticity::Impostor))
    }

    /// Thread name for this actor, e.g. `impostor-writer-1`.
    pub fn label(&self) -> String {
        match self.authenticity {
            Authenticity::Genuine => format!("{}-{}", self.role, self.identity),
            Authenticity::Impostor => format!("impostor-{}-{}", self.role, self.identity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::RoleLayout;

    fn registry() -> CredentialRegistry {
        let creds = (0..10).map(|i| Credential::new(500_000 + i)).collect();
        CredentialRegistry::from_parts(creds, RoleLayout::new(3, 2))
    }

    #[test]
    fn genuine_actor_takes_slot_credential() {
        let registry = registry();
        let reader = Actor::genuine(&registry, Role::Reader, 2).unwrap();
        let writer = Actor::genuine(&registry, Role::Writer, 1).unwrap();

        assert_eq!(reader.credential, Credential::new(500_002));
        assert_eq!(writer.credential, Credential::new(500_004));
        assert_eq!(writer.authenticity, Authenticity::Genuine);
    }

    #[test]
    fn genuine_actor_requires_role_slots() {
        let registry = CredentialRegistry::from_parts(
            vec![Credential::new(500_000)],
            RoleLayout::new(1, 0),
        );
        assert!(Actor::genuine(&registry, Role::Writer, 0).is_none());
    }

    #[test]
    fn labels() {
        let registry = registry();
        let reader = Actor::genuine(&registry, Role::Reader, 0).unwrap();
        let fake = Actor::new(1, Role::Writer, Credential::new(123_456), Authenticity::Impostor);

        assert_eq!(reader.label(), "reader-0");
        assert_eq!(fake.label(), "impostor-writer-1");
    }
}
