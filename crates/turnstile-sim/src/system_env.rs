//! Production Environment implementations.
//!
//! `SystemEnv` uses real system time, OS entropy and real thread sleeps.
//! `SeededEnv` keeps the real clock and sleeps but draws randomness from a
//! seeded ChaCha stream so a run's credential table and written values can be
//! reproduced with `--seed`.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::Mutex;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use turnstile_core::Environment;

/// Production environment using system time and OS randomness.
///
/// This implementation:
/// - Uses `std::time::Instant::now()` for time
/// - Uses `std::thread::sleep()` for blocking delays
/// - Uses `getrandom` for randomness
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer).unwrap_or_else(|e| {
            // NOTE: This should never fail on supported platforms. Fill with
            // zeros rather than panic an actor thread; credential sampling
            // then exhausts its draw budget and the run fails with
            // `EntropyExhausted`.
            tracing::error!("getrandom failed: {}", e);
            buffer.fill(0);
        });
    }
}

/// Real-time environment with a reproducible random stream.
#[derive(Debug, Clone)]
pub struct SeededEnv {
    rng: Arc<Mutex<ChaCha8Rng>>,
}

impl SeededEnv {
    /// Create an environment whose random stream is fixed by `seed`.
    pub fn new(seed: u64) -> Self {
        Self { rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))) }
    }
}

impl Environment for SeededEnv {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        self.rng.lock().fill_bytes(buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_env_time_advances() {
        let env = SystemEnv::new();

        let t1 = env.now();
        env.sleep(Duration::from_millis(10));
        let t2 = env.now();

        assert!(t2 > t1, "Time should advance");
    }

    #[test]
    fn system_env_random_bytes_are_random() {
        let env = SystemEnv::new();

        let mut bytes1 = [0u8; 32];
        let mut bytes2 = [0u8; 32];

        env.random_bytes(&mut bytes1);
        env.random_bytes(&mut bytes2);

        // Extremely unlikely to be equal if random
        assert_ne!(bytes1, bytes2, "Random bytes should differ");
    }

    #[test]
    fn system_env_sleep_waits() {
        let env = SystemEnv::new();

        let start = env.now();
        env.sleep(Duration::from_millis(50));
        let elapsed = env.now() - start;

        assert!(elapsed >= Duration::from_millis(50), "Sleep should wait at least 50ms");
    }

    #[test]
    fn seeded_env_is_reproducible() {
        let a = SeededEnv::new(2024);
        let b = SeededEnv::new(2024);

        let xs: Vec<u32> = (0..8).map(|_| a.random_in(0, 9_999)).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.random_in(0, 9_999)).collect();

        assert_eq!(xs, ys);
    }

    #[test]
    fn seeded_env_clones_share_stream() {
        let a = SeededEnv::new(5);
        let b = a.clone();
        let fresh = SeededEnv::new(5);

        let first = a.random_u64();
        let second = b.random_u64();

        assert_eq!(first, fresh.random_u64());
        assert_eq!(second, fresh.random_u64());
    }
}
