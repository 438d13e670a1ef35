//! Seeded 64-bit hashing over byte keys.

use core::cell::RefCell;
use core::hash::BuildHasher;
use std::collections::hash_map::RandomState;
use xxhash_rust::xxh3::Xxh3;

/// Hash function used by a map to place keys into buckets.
///
/// Implementations must be pure with respect to `(seed, key)`: the same key
/// always hashes to the same value for the lifetime of the hasher. The low
/// bits select the bucket and the top byte is the per-slot quick filter, so
/// both ends of the output should be well mixed.
pub trait KeyHasher {
    /// 64-bit hash of `key` under this hasher's seed.
    fn hash(&self, key: &[u8]) -> u64;
    /// Seed fixed at construction; two maps hash alike iff their seeds match.
    fn seed(&self) -> u64;
}

/// XXH3-64 keyed by a per-instance seed.
///
/// The streaming state is kept between calls and reset after every digest.
pub struct SeededHasher {
    seed: u64,
    state: RefCell<Xxh3>,
}

impl SeededHasher {
    /// Hasher with a fresh random seed.
    pub fn new() -> Self {
        Self::with_seed(random_seed())
    }

    /// Hasher with a fixed seed, for reproducible layouts.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            state: RefCell::new(Xxh3::with_seed(seed)),
        }
    }
}

impl Default for SeededHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SeededHasher {
    fn clone(&self) -> Self {
        Self::with_seed(self.seed)
    }
}

impl core::fmt::Debug for SeededHasher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SeededHasher")
            .field("seed", &self.seed)
            .finish()
    }
}

impl KeyHasher for SeededHasher {
    fn hash(&self, key: &[u8]) -> u64 {
        let mut state = self.state.borrow_mut();
        state.update(key);
        let h = state.digest();
        state.reset();
        h
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}

// RandomState is keyed randomly per process and perturbed per instance.
fn random_seed() -> u64 {
    RandomState::new().hash_one(0x9e37_79b9_7f4a_7c15_u64)
}

/// Quick-filter byte stored per slot.
#[inline]
pub(crate) fn top_hash(hash: u64) -> u8 {
    (hash >> 56) as u8
}

/// Head bucket index for `hash` in a table of `2^b` buckets.
#[inline]
pub(crate) fn bucket_index(hash: u64, b: u8) -> usize {
    (hash & ((1u64 << b) - 1)) as usize
}
