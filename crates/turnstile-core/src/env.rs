//! Environment abstraction for deterministic testing.
//!
//! The `Environment` trait decouples the admission and access logic from
//! system resources (time, randomness, blocking delays). This enables:
//!
//! - Deterministic Simulation: a seeded RNG and a no-op sleep make credential
//!   tables and written values reproducible, and keep tests fast.
//!
//! - Production Runtime: the system implementation uses OS entropy and real
//!   thread sleeps without any change to the coordinator or the gate.
//!
//! # Invariants
//!
//! - Monotonicity: `env.now()` must never go backwards
//! - Determinism: Given the same seed, `random_bytes()` produces the same
//!   sequence
//! - Isolation: Implementations must not share global state

use std::time::{Duration, Instant};

/// Abstract environment providing time, randomness, and blocking delays.
///
/// Every actor thread holds a clone of the environment, so implementations
/// must be cheap to clone and safe to share.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Returns the current time.
    ///
    /// # Invariants
    ///
    /// - Monotonicity: subsequent calls must return times >= previous calls
    ///   within a single thread.
    fn now(&self) -> Instant;

    /// Blocks the calling thread for the specified duration.
    ///
    /// Only the calling actor is suspended; other actors keep running.
    fn sleep(&self, duration: Duration);

    /// Fills the provided buffer with random bytes.
    ///
    /// # Invariants
    ///
    /// - Determinism during simulations: Given the same RNG seed, this produces
    ///   the same sequence of bytes
    /// - Unpredictability in production: Uses OS entropy
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random `u64`.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }

    /// Generates a random `u32` in the inclusive range `[low, high]`.
    ///
    /// Uses modulo reduction. The bias is negligible for the small ranges
    /// used here (a 64-bit draw reduced to at most 900 000 values).
    fn random_in(&self, low: u32, high: u32) -> u32 {
        debug_assert!(low <= high, "empty range [{low}, {high}]");
        let span = u64::from(high - low) + 1;
        let offset = self.random_u64() % span;
        // offset < span <= u32::MAX + 1, so it always fits
        low + u32::try_from(offset).unwrap_or(0)
    }
}
