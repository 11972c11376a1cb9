//! Credential registry.
//!
//! Generates the fixed table of per-role credentials at startup and answers
//! lookup and membership queries afterwards. The registry is immutable once
//! built, so actor threads share it through an `Arc` without locking.
//!
//! ## Layout
//!
//! ```text
//! slot:  0 .. readers | readers .. readers+writers | .. pool_size
//!        reader slots | writer slots               | unused
//! ```
//!
//! An actor's slot within its role is `identity mod role_slots`. Identities
//! beyond the role's slot count alias onto lower slots.

use std::{collections::HashSet, fmt};

use crate::{env::Environment, error::RegistryError};

/// Smallest credential value.
pub const CREDENTIAL_MIN: u32 = 100_000;

/// Largest credential value.
pub const CREDENTIAL_MAX: u32 = 999_999;

/// Number of distinct credential values.
pub const CREDENTIAL_SPACE: usize = (CREDENTIAL_MAX - CREDENTIAL_MIN + 1) as usize;

/// Opaque six-digit access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Credential(u32);

impl Credential {
    /// Wrap a raw token value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw token value.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Draw a credential uniformly from `[CREDENTIAL_MIN, CREDENTIAL_MAX]`.
    pub fn random<E: Environment>(env: &E) -> Self {
        Self(env.random_in(CREDENTIAL_MIN, CREDENTIAL_MAX))
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

/// Access role an actor claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Shared access, concurrent with other readers.
    Reader,
    /// Exclusive access.
    Writer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reader => f.write_str("reader"),
            Self::Writer => f.write_str("writer"),
        }
    }
}

/// Number of credential slots assigned to each role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleLayout {
    /// Reader slots, starting at slot 0.
    pub readers: usize,
    /// Writer slots, immediately after the reader slots.
    pub writers: usize,
}

impl RoleLayout {
    /// Create a layout.
    pub const fn new(readers: usize, writers: usize) -> Self {
        Self { readers, writers }
    }

    /// Slots used by both roles.
    pub const fn total(&self) -> usize {
        self.readers + self.writers
    }

    /// Slot count for a role.
    pub const fn slots(&self, role: Role) -> usize {
        match role {
            Role::Reader => self.readers,
            Role::Writer => self.writers,
        }
    }

    /// First pool index of a role's slots.
    const fn base(&self, role: Role) -> usize {
        match role {
            Role::Reader => 0,
            Role::Writer => self.readers,
        }
    }
}

/// Consecutive misses allowed per expected draw before sampling gives up.
const DRAW_BUDGET_FACTOR: usize = 64;

/// Draws allowed to find one value outside `taken` used values.
///
/// Scales with the expected number of draws, `space / free`, so a healthy
/// RNG practically never exhausts it while a stuck one fails fast.
fn draw_budget(taken: usize) -> usize {
    let free = CREDENTIAL_SPACE.saturating_sub(taken).max(1);
    CREDENTIAL_SPACE.div_ceil(free).saturating_mul(DRAW_BUDGET_FACTOR)
}

/// Generate `count` pairwise distinct credentials.
///
/// Duplicates drawn from the RNG are rejected and redrawn.
///
/// # Errors
///
/// `EntropyExhausted` if the RNG keeps repeating values, e.g. a failed
/// entropy source returning constant bytes.
pub fn generate_credentials<E: Environment>(
    env: &E,
    count: usize,
) -> Result<Vec<Credential>, RegistryError> {
    let count = count.min(CREDENTIAL_SPACE);
    let mut seen = HashSet::with_capacity(count);
    let mut credentials = Vec::with_capacity(count);

    while credentials.len() < count {
        let budget = draw_budget(credentials.len());
        let fresh = (0..budget).map(|_| Credential::random(env)).find(|c| seen.insert(*c));
        let Some(candidate) = fresh else {
            return Err(RegistryError::EntropyExhausted { attempts: budget });
        };
        credentials.push(candidate);
    }

    Ok(credentials)
}

/// Role-ordered table of valid credentials.
#[derive(Debug, Clone)]
pub struct CredentialRegistry {
    /// Credentials in slot order.
    credentials: Vec<Credential>,
    /// Membership index for `contains`.
    index: HashSet<Credential>,
    /// Role slot assignment.
    layout: RoleLayout,
}

impl CredentialRegistry {
    /// Generate a registry of `pool_size` distinct credentials for `layout`.
    ///
    /// # Errors
    ///
    /// - `PoolTooSmall` if the pool cannot cover every role slot
    /// - `PoolTooLarge` if no credential value would remain for impostors
    /// - `EntropyExhausted` if the RNG cannot produce distinct values
    pub fn generate<E: Environment>(
        env: &E,
        layout: RoleLayout,
        pool_size: usize,
    ) -> Result<Self, RegistryError> {
        if pool_size < layout.total() {
            return Err(RegistryError::PoolTooSmall { pool_size, required: layout.total() });
        }
        if pool_size >= CREDENTIAL_SPACE {
            return Err(RegistryError::PoolTooLarge { pool_size, max: CREDENTIAL_SPACE - 1 });
        }

        let credentials = generate_credentials(env, pool_size)?;
        tracing::debug!(
            pool_size,
            readers = layout.readers,
            writers = layout.writers,
            "generated credential pool"
        );

        Ok(Self::from_parts(credentials, layout))
    }

    /// Build a registry from known credentials.
    ///
    /// Duplicate values are dropped from the membership index but keep their
    /// slot, so callers that need distinctness should use [`Self::generate`].
    pub fn from_parts(credentials: Vec<Credential>, layout: RoleLayout) -> Self {
        let index = credentials.iter().copied().collect();
        Self { credentials, index, layout }
    }

    /// Role slot assignment.
    pub fn layout(&self) -> RoleLayout {
        self.layout
    }

    /// All credentials in slot order.
    pub fn credentials(&self) -> &[Credential] {
        &self.credentials
    }

    /// Pool size.
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// True if the pool holds no credentials.
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Credential of the `slot`-th slot of `role`.
    ///
    /// Returns `None` if `slot` is outside the role's slots.
    pub fn lookup(&self, role: Role, slot: usize) -> Option<Credential> {
        if slot >= self.layout.slots(role) {
            return None;
        }
        self.credentials.get(self.layout.base(role) + slot).copied()
    }

    /// Slot selected for `identity` within `role`: `identity mod role_slots`.
    ///
    /// Returns `None` if the role has no slots.
    pub fn slot_for(&self, role: Role, identity: u32) -> Option<usize> {
        let slots = self.layout.slots(role);
        if slots == 0 {
            return None;
        }
        Some(identity as usize % slots)
    }

    /// True if `candidate` is any live credential, regardless of role.
    pub fn contains(&self, candidate: Credential) -> bool {
        self.index.contains(&candidate)
    }

    /// Draw a credential guaranteed absent from the registry.
    ///
    /// Rejection-samples the credential range until a value outside the pool
    /// is found.
    ///
    /// # Errors
    ///
    /// `EntropyExhausted` if no such value turns up within the draw budget.
    pub fn mint_impostor<E: Environment>(&self, env: &E) -> Result<Credential, RegistryError> {
        let attempts = draw_budget(self.index.len());
        (0..attempts)
            .map(|_| Credential::random(env))
            .find(|candidate| !self.contains(*candidate))
            .ok_or(RegistryError::EntropyExhausted { attempts })
    }
}
