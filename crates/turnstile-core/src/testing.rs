//! Environments shared by the unit tests.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::Mutex;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{credential::CREDENTIAL_MIN, env::Environment};

/// Seeded ChaCha stream with a no-op sleep.
#[derive(Clone)]
pub struct SeededEnv(Arc<Mutex<ChaCha8Rng>>);

impl SeededEnv {
    pub fn new(seed: u64) -> Self {
        Self(Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))))
    }
}

impl Environment for SeededEnv {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, _duration: Duration) {}

    fn random_bytes(&self, buffer: &mut [u8]) {
        self.0.lock().fill_bytes(buffer);
    }
}

/// Replays a fixed script of credential values, then repeats the last one.
#[derive(Clone)]
pub struct ScriptedEnv(Arc<Mutex<Vec<u32>>>);

impl ScriptedEnv {
    pub fn new(script: Vec<u32>) -> Self {
        Self(Arc::new(Mutex::new(script)))
    }
}

impl Environment for ScriptedEnv {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, _duration: Duration) {}

    fn random_bytes(&self, buffer: &mut [u8]) {
        let mut script = self.0.lock();
        let next = if script.len() > 1 { script.remove(0) } else { script[0] };
        let raw = u64::from(next - CREDENTIAL_MIN).to_be_bytes();
        buffer.copy_from_slice(&raw[..buffer.len()]);
    }
}

/// Entropy source that only ever yields zero bytes.
#[derive(Clone, Copy)]
pub struct ZeroEnv;

impl Environment for ZeroEnv {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, _duration: Duration) {}

    fn random_bytes(&self, buffer: &mut [u8]) {
        buffer.fill(0);
    }
}
