//! Fuzz target for the [`Coordinator`] access state machine
//!
//! Prevent readers and writers from ever sharing the buffer
//!
//! # Strategy
//!
//! - Operation sequences: Arbitrary interleavings of entries, exits, writes
//!   and observations across a handful of holders
//! - Misuse: Exits and writes by holders that hold nothing, double entries
//! - Contention: Entries attempted while the opposite role is inside
//!
//! # Invariants
//!
//! - Real coordinator and reference model agree on every result
//! - Real access state equals the model's after every operation
//! - `Writing` NEVER coexists with active readers
//! - Dropping every guard ALWAYS returns the coordinator to `Idle`
//! - NEVER panic on out-of-order exits

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use turnstile_core::{AccessState, Coordinator};
use turnstile_harness::{CoordinatorDriver, ModelResource, Operation};

/// Holders in play; small so operations collide often.
const HOLDERS: usize = 4;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    initial: u16,
    operations: Vec<Operation>,
}

fuzz_target!(|input: FuzzInput| {
    let initial = u32::from(input.initial);
    let coordinator = Coordinator::new(initial);
    let mut real = CoordinatorDriver::new(&coordinator);
    let mut model = ModelResource::new(initial);

    for op in input.operations.into_iter().take(512) {
        let op = op.clamp(HOLDERS);

        let expected = model.apply(&op);
        let actual = real.apply(&op);
        assert_eq!(expected, actual, "divergence on {op:?}");

        let state = coordinator.state();
        assert_eq!(model.access_state(), state, "state divergence after {op:?}");
        assert!(
            !(state.is_writing() && state.active_readers() > 0),
            "writer coexists with readers: {state:?}"
        );
    }

    real.release_all();
    assert_eq!(coordinator.state(), AccessState::Idle);
    drop(real);
    assert_eq!(coordinator.into_value(), model.value());
});
