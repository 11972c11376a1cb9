//! Access Coordinator
//!
//! Owns the shared buffer and enforces "many readers XOR one writer" around
//! it. This is the only mutation surface for the buffer and the reader count.
//!
//! ## Locks
//!
//! - Counting lock: a `parking_lot::Mutex` around the [`AccessState`]. Every
//!   transition, including the first-reader and last-reader decisions, runs
//!   under it, so two readers entering or leaving together cannot disagree
//!   about who takes or releases exclusion. Critical sections are O(1).
//! - Exclusion: the state itself. It is held for the whole lifetime of a
//!   [`ReadGuard`] cohort or a [`WriteGuard`], not across the counting-lock
//!   sections. Waiters park on a `Condvar` until the state returns to `Idle`.
//!
//! ## Scoped acquisition
//!
//! `enter_read` and `enter_write` return guards; the matching exit runs in
//! `Drop`, so release happens even if the access body panics. There is no
//! public unpaired exit.
//!
//! ## Fairness
//!
//! None beyond what `parking_lot` provides. A continuous stream of readers
//! can starve a waiting writer.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use parking_lot::{Condvar, Mutex};

use crate::access::AccessState;

/// Counting-lock protected state.
#[derive(Debug, Default)]
struct Counting {
    state: AccessState,
    max_concurrent_readers: u32,
}

impl Counting {
    fn apply(&mut self, next: AccessState) {
        self.state = next;
        self.max_concurrent_readers = self.max_concurrent_readers.max(next.active_readers());
    }
}

/// Counters describing coordinator activity so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoordinatorStats {
    /// Reader entries granted.
    pub reads: u64,
    /// Buffer mutations performed by writers.
    pub writes: u64,
    /// Highest reader count observed at once.
    pub max_concurrent_readers: u32,
}

/// Readers-writers coordinator around a single integer buffer.
#[derive(Debug)]
pub struct Coordinator {
    counting: Mutex<Counting>,
    /// Signalled whenever the state returns to `Idle`.
    released: Condvar,
    /// Ordered by the counting lock: every write happens before the writer's
    /// exit, every read after the reader's entry.
    value: AtomicU32,
    reads: AtomicU64,
    writes: AtomicU64,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Coordinator {
    /// Create an idle coordinator holding `initial`.
    pub fn new(initial: u32) -> Self {
        Self {
            counting: Mutex::new(Counting::default()),
            released: Condvar::new(),
            value: AtomicU32::new(initial),
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
        }
    }

    /// Join the reader cohort, blocking while a writer is active or the
    /// cohort is full.
    pub fn enter_read(&self) -> ReadGuard<'_> {
        let mut counting = self.counting.lock();
        loop {
            match counting.state.enter_read() {
                Ok(next) => {
                    counting.apply(next);
                    break;
                },
                Err(_) => self.released.wait(&mut counting),
            }
        }
        drop(counting);

        self.reads.fetch_add(1, Ordering::Relaxed);
        ReadGuard { coordinator: self }
    }

    /// Join the reader cohort if no writer is active.
    pub fn try_enter_read(&self) -> Option<ReadGuard<'_>> {
        let mut counting = self.counting.lock();
        let next = counting.state.enter_read().ok()?;
        counting.apply(next);
        drop(counting);

        self.reads.fetch_add(1, Ordering::Relaxed);
        Some(ReadGuard { coordinator: self })
    }

    /// Take exclusive access, blocking until no reader or writer is active.
    pub fn enter_write(&self) -> WriteGuard<'_> {
        let mut counting = self.counting.lock();
        loop {
            match counting.state.enter_write() {
                Ok(next) => {
                    counting.apply(next);
                    break;
                },
                Err(_) => self.released.wait(&mut counting),
            }
        }

        WriteGuard { coordinator: self }
    }

    /// Take exclusive access if the resource is idle.
    pub fn try_enter_write(&self) -> Option<WriteGuard<'_>> {
        let mut counting = self.counting.lock();
        let next = counting.state.enter_write().ok()?;
        counting.apply(next);

        Some(WriteGuard { coordinator: self })
    }

    /// Snapshot of the access state.
    pub fn state(&self) -> AccessState {
        self.counting.lock().state
    }

    /// Snapshot of the activity counters.
    pub fn stats(&self) -> CoordinatorStats {
        let max_concurrent_readers = self.counting.lock().max_concurrent_readers;
        CoordinatorStats {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            max_concurrent_readers,
        }
    }

    /// Consume the coordinator and return the final buffer value.
    ///
    /// Taking `self` by value proves no guard is outstanding.
    pub fn into_value(self) -> u32 {
        self.value.into_inner()
    }

    fn exit_read(&self) {
        let mut counting = self.counting.lock();
        match counting.state.exit_read() {
            Ok(next) => {
                counting.apply(next);
                if !next.exclusion_held() {
                    tracing::trace!("last reader out, releasing exclusion");
                    self.released.notify_all();
                }
            },
            // Unreachable while guards are the only way in.
            Err(err) => tracing::error!(%err, "reader exit rejected"),
        }
    }

    fn exit_write(&self) {
        let mut counting = self.counting.lock();
        match counting.state.exit_write() {
            Ok(next) => {
                counting.apply(next);
                self.released.notify_all();
            },
            Err(err) => tracing::error!(%err, "writer exit rejected"),
        }
    }
}

/// Membership in the active reader cohort. Leaves the cohort on drop.
#[must_use = "dropping the guard immediately ends the read"]
#[derive(Debug)]
pub struct ReadGuard<'a> {
    coordinator: &'a Coordinator,
}

impl ReadGuard<'_> {
    /// Observe the buffer.
    pub fn value(&self) -> u32 {
        self.coordinator.value.load(Ordering::Relaxed)
    }
}

impl Drop for ReadGuard<'_> {
    fn drop(&mut self) {
        self.coordinator.exit_read();
    }
}

/// Exclusive access to the buffer. Releases exclusion on drop.
#[must_use = "dropping the guard immediately ends the write"]
#[derive(Debug)]
pub struct WriteGuard<'a> {
    coordinator: &'a Coordinator,
}

impl WriteGuard<'_> {
    /// Current buffer value.
    pub fn value(&self) -> u32 {
        self.coordinator.value.load(Ordering::Relaxed)
    }

    /// Replace the buffer value.
    pub fn set(&mut self, value: u32) {
        self.coordinator.value.store(value, Ordering::Relaxed);
        self.coordinator.writes.fetch_add(1, Ordering::Relaxed);
    }
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        self.coordinator.exit_write();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Barrier, mpsc},
        thread,
        time::Duration,
    };

    use super::*;

    #[test]
    fn starts_idle_with_initial_value() {
        let coordinator = Coordinator::new(7);
        assert_eq!(coordinator.state(), AccessState::Idle);
        assert_eq!(coordinator.enter_read().value(), 7);
    }

    #[test]
    fn readers_share_access() {
        let coordinator = Coordinator::default();
        let a = coordinator.enter_read();
        let b = coordinator.try_enter_read().unwrap();

        assert_eq!(coordinator.state(), AccessState::Reading(2));
        assert!(coordinator.try_enter_write().is_none());

        drop(a);
        assert_eq!(coordinator.state(), AccessState::Reading(1));
        drop(b);
        assert_eq!(coordinator.state(), AccessState::Idle);
    }

    #[test]
    fn writer_excludes_everyone() {
        let coordinator = Coordinator::default();
        let writer = coordinator.enter_write();

        assert!(coordinator.try_enter_read().is_none());
        assert!(coordinator.try_enter_write().is_none());
        assert_eq!(coordinator.state(), AccessState::Writing);

        drop(writer);
        assert!(coordinator.try_enter_read().is_some());
    }

    #[test]
    fn write_then_read_round_trip() {
        let coordinator = Coordinator::default();
        {
            let mut writer = coordinator.enter_write();
            writer.set(4242);
        }
        assert_eq!(coordinator.enter_read().value(), 4242);
        assert_eq!(coordinator.into_value(), 4242);
    }

    #[test]
    fn stats_count_entries_and_mutations() {
        let coordinator = Coordinator::default();
        {
            let _a = coordinator.enter_read();
            let _b = coordinator.enter_read();
            let _c = coordinator.enter_read();
        }
        {
            let mut writer = coordinator.enter_write();
            writer.set(1);
        }
        // Entered but never mutated.
        drop(coordinator.enter_write());

        assert_eq!(
            coordinator.stats(),
            CoordinatorStats { reads: 3, writes: 1, max_concurrent_readers: 3 }
        );
    }

    #[test]
    fn blocked_writer_proceeds_after_last_reader() {
        let coordinator = Arc::new(Coordinator::default());
        let reader = coordinator.enter_read();
        let (tx, rx) = mpsc::channel();

        let writer = {
            let coordinator = Arc::clone(&coordinator);
            thread::spawn(move || {
                let mut guard = coordinator.enter_write();
                guard.set(99);
                tx.send(()).unwrap();
            })
        };

        // Writer must still be parked while the reader holds the cohort.
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
        assert_eq!(coordinator.state(), AccessState::Reading(1));

        drop(reader);
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        writer.join().unwrap();

        assert_eq!(coordinator.enter_read().value(), 99);
    }

    #[test]
    fn blocked_readers_proceed_after_writer() {
        let coordinator = Arc::new(Coordinator::default());
        let mut writer = coordinator.enter_write();
        let barrier = Arc::new(Barrier::new(4));

        let readers: Vec<_> = (0..3)
            .map(|_| {
                let coordinator = Arc::clone(&coordinator);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    coordinator.enter_read().value()
                })
            })
            .collect();

        barrier.wait();
        thread::sleep(Duration::from_millis(20));
        writer.set(17);
        drop(writer);

        for reader in readers {
            assert_eq!(reader.join().unwrap(), 17);
        }
        assert_eq!(coordinator.state(), AccessState::Idle);
    }

    #[test]
    fn panicking_writer_still_releases() {
        let coordinator = Arc::new(Coordinator::default());

        let result = {
            let coordinator = Arc::clone(&coordinator);
            thread::spawn(move || {
                let mut guard = coordinator.enter_write();
                guard.set(5);
                panic!("write body failed");
            })
            .join()
        };

        assert!(result.is_err());
        assert_eq!(coordinator.state(), AccessState::Idle);
        assert_eq!(coordinator.enter_read().value(), 5);
    }
}
