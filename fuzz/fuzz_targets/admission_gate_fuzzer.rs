//! Fuzz target for [`AdmissionGate`]
//!
//! Prevent admission with any credential other than the one registered for
//! the actor's role and identity
//!
//! # Strategy
//!
//! - Registries: Arbitrary credential tables, including duplicates and
//!   layouts larger than the table
//! - Actors: Arbitrary role, identity and presented credential
//! - Cross-role attempts: Present the credential of the other role's slot
//!
//! # Invariants
//!
//! - Admitted IFF the presented credential equals `expected_for(role, id)`
//! - A role with no slots NEVER admits
//! - Rejection ALWAYS carries the presented and expected credentials
//! - NEVER panic on any registry shape or identity

#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use turnstile_core::{
    Actor, AdmissionError, AdmissionGate, Authenticity, Credential, CredentialRegistry, Role,
    RoleLayout,
};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    credentials: Vec<u32>,
    readers: u8,
    writers: u8,
    attempts: Vec<Attempt>,
}

#[derive(Debug, Arbitrary)]
struct Attempt {
    writer: bool,
    identity: u32,
    presented: Presented,
}

#[derive(Debug, Arbitrary)]
enum Presented {
    /// Raw value, almost always wrong.
    Raw(u32),
    /// Credential of the same slot in the other role.
    CrossRole,
    /// Whatever the gate expects.
    Expected,
}

fuzz_target!(|input: FuzzInput| {
    let credentials: Vec<Credential> =
        input.credentials.into_iter().take(64).map(Credential::new).collect();
    let layout = RoleLayout::new(usize::from(input.readers % 16), usize::from(input.writers % 16));
    let registry = Arc::new(CredentialRegistry::from_parts(credentials, layout));
    let gate = AdmissionGate::new(Arc::clone(&registry));

    for attempt in input.attempts.into_iter().take(256) {
        let (role, other) =
            if attempt.writer { (Role::Writer, Role::Reader) } else { (Role::Reader, Role::Writer) };
        let expected = gate.expected_for(role, attempt.identity);

        let presented = match attempt.presented {
            Presented::Raw(value) => Credential::new(value),
            Presented::CrossRole => match gate.expected_for(other, attempt.identity) {
                Some(credential) => credential,
                None => continue,
            },
            Presented::Expected => match expected {
                Some(credential) => credential,
                None => continue,
            },
        };

        let actor = Actor::new(attempt.identity, role, presented, Authenticity::Impostor);
        let admitted = gate.admit(&actor);

        assert_eq!(admitted, expected == Some(presented), "admission mismatch for {actor:?}");
        if layout.slots(role) == 0 {
            assert!(!admitted, "role without slots admitted {actor:?}");
        }

        match gate.check(&actor) {
            Ok(()) => assert!(admitted),
            Err(AdmissionError::Rejected { presented: p, expected: e, role: r, identity }) => {
                assert_eq!(p, presented);
                assert_eq!(e, expected);
                assert_eq!(r, role);
                assert_eq!(identity, attempt.identity);
            },
        }
    }
});
