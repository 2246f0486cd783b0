//! The hash state of [`Mapping`](crate::Mapping) indices.

use core::hash::BuildHasher;

use foldhash::fast::{FixedState, FoldHasher};

const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x7663_5F76_616C_7565);

/// A `foldhash` state with a crate-wide seed, usable without `std`.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FoldHasher<'static>;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}
