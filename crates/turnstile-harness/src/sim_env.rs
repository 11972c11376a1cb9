//! Simulated environment with a virtual clock and seeded randomness.
//!
//! Sleeping advances a shared virtual clock instead of blocking, so runs with
//! long work delays finish immediately. The calling thread still yields, which
//! lets other actor threads interleave at the same points a real sleep would.

use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use parking_lot::Mutex;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use turnstile_core::Environment;

#[derive(Debug)]
struct SimState {
    rng: ChaCha8Rng,
    elapsed: Duration,
}

/// Deterministic environment for tests.
///
/// Clones share one RNG stream and one clock.
#[derive(Debug, Clone)]
pub struct SimEnv {
    state: Arc<Mutex<SimState>>,
    epoch: Instant,
}

impl SimEnv {
    /// Create an environment seeded with `seed`.
    pub fn with_seed(seed: u64) -> Self {
        let state = SimState { rng: ChaCha8Rng::seed_from_u64(seed), elapsed: Duration::ZERO };
        Self { state: Arc::new(Mutex::new(state)), epoch: Instant::now() }
    }

    /// Total virtual time slept by all threads.
    pub fn elapsed(&self) -> Duration {
        self.state.lock().elapsed
    }
}

impl Default for SimEnv {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Environment for SimEnv {
    fn now(&self) -> Instant {
        self.epoch + self.state.lock().elapsed
    }

    fn sleep(&self, duration: Duration) {
        self.state.lock().elapsed += duration;
        thread::yield_now();
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        self.state.lock().rng.fill_bytes(buffer);
    }
}
