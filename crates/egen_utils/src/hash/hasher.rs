//! Seeded `foldhash` state shared by every registry map.
//!
//! The seed is a constant, so two runs hash the same key to the same value.

use core::hash::BuildHasher;

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHashState

const SEED: FixedState = FixedState::with_seed(0x5E6D_7A01_C4F3_2B71);

/// The hasher built by [`FixedHashState`].
pub type FixedHasher = FoldHasher<'static>;

/// Builds [`FixedHasher`]s from the crate-wide constant seed.
///
/// ```
/// use core::hash::BuildHasher;
/// use egen_utils::hash::FixedHashState;
///
/// assert_eq!(
///     FixedHashState.hash_one("ArrayList"),
///     FixedHashState.hash_one("ArrayList"),
/// );
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        SEED.build_hasher()
    }
}

#[cfg(test)]
mod tests {
    use super::FixedHashState;
    use crate::hash::{new_map, new_set};
    use core::hash::BuildHasher;

    #[test]
    fn stable_hash() {
        assert_eq!(
            FixedHashState.hash_one(42_u64),
            FixedHashState.hash_one(42_u64)
        );
        assert_ne!(
            FixedHashState.hash_one("TreeMap"),
            FixedHashState.hash_one("HashMap")
        );
    }

    #[test]
    fn containers() {
        let mut map = new_map::<&str, i32>();
        map.insert("a", 1);
        assert_eq!(map.get("a"), Some(&1));

        let mut set = new_set::<&str>();
        assert!(set.insert("a"));
        assert!(!set.insert("a"));
    }
}
