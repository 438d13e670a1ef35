//! Growth triggers and the two stop-the-world rebuild passes.
//!
//! Both passes move every live entry out of the old arena into a freshly
//! allocated one and return it together with the number of overflow
//! buckets the rebuild allocated. Nothing else can observe the map while a
//! pass runs: it executes inside the `&mut self` borrow of `set`.

use crate::chain::{BucketArena, BucketId};

/// Average load factor is `LOAD_FACTOR_NUM / LOAD_FACTOR_DEN` (6.5) slots per bucket.
pub const LOAD_FACTOR_NUM: usize = 13;
pub const LOAD_FACTOR_DEN: usize = 2;

/// Overflow threshold exponent cap: at most `2^15` overflow buckets.
pub const MAX_OVERFLOW_EXPONENT: u8 = 15;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Growth {
    /// Double the bucket count, splitting each chain in two.
    Double,
    /// Same bucket count, chains repacked densely.
    SameSize,
}

/// `count` entries would exceed the average load factor.
#[inline]
pub(crate) fn over_load_factor(count: usize, bucket_count: usize) -> bool {
    count > bucket_count * LOAD_FACTOR_NUM / LOAD_FACTOR_DEN
}

/// The approximate overflow counter reached `min(2^b, 2^15)`.
#[inline]
pub(crate) fn too_many_overflow_buckets(noverflow: usize, b: u8) -> bool {
    noverflow >= 1usize << b.min(MAX_OVERFLOW_EXPONENT)
}

/// Count one newly allocated overflow bucket.
///
/// Exact below `b = 16`. Above that the threshold is capped at `2^15`, so
/// each allocation only counts with probability `2^(15 - b)`, sampled from
/// hash bits that neither the bucket index nor the top byte use.
#[inline]
pub(crate) fn note_overflow(noverflow: &mut usize, b: u8, hash: u64) {
    if b <= MAX_OVERFLOW_EXPONENT {
        *noverflow += 1;
        return;
    }
    let mask = (1u64 << (b - MAX_OVERFLOW_EXPONENT).min(16)) - 1;
    if (hash >> 40) & mask == 0 {
        *noverflow += 1;
    }
}

/// Growth required before inserting one more entry, if any.
/// Doubling takes precedence since it rebuilds the chains too.
pub(crate) fn growth_needed(count: usize, b: u8, noverflow: usize) -> Option<Growth> {
    if over_load_factor(count + 1, 1usize << b) {
        Some(Growth::Double)
    } else if too_many_overflow_buckets(noverflow, b) {
        Some(Growth::SameSize)
    } else {
        None
    }
}

pub(crate) struct Rebuilt<V> {
    pub(crate) arena: BucketArena<V>,
    pub(crate) noverflow: usize,
}

/// Move into `2^(b+1)` buckets. An entry at head `i` goes to `i` when bit
/// `b` of its hash is clear and to `i + 2^b` when it is set.
pub(crate) fn double<V>(old: BucketArena<V>, b: u8) -> Rebuilt<V> {
    let split = 1usize << b;
    rebuild(old, b + 1, |index, hash| {
        if hash & (1u64 << b) == 0 {
            index
        } else {
            index + split
        }
    })
}

/// Repack into a fresh arena of `2^b` buckets, each entry keeping its index.
pub(crate) fn same_size<V>(old: BucketArena<V>, b: u8) -> Rebuilt<V> {
    rebuild(old, b, |index, _| index)
}

fn rebuild<V, F>(old: BucketArena<V>, new_b: u8, route: F) -> Rebuilt<V>
where
    F: Fn(usize, u64) -> usize,
{
    let mut arena = BucketArena::with_heads(new_b);
    // Fill cursor per destination chain: the new arena has no holes, so the
    // first bucket with room is never before the last one written.
    let mut cursors: Vec<BucketId> = (0..arena.head_count()).map(|i| arena.head(i)).collect();
    let mut noverflow = 0;

    for (index, hash, key, value) in old.into_entries() {
        let dest = route(index, hash);
        debug_assert_eq!(dest, crate::hash::bucket_index(hash, new_b));
        let placed = arena.insert_from(cursors[dest], key, value, hash);
        cursors[dest] = placed.at.bucket;
        if placed.new_overflow {
            note_overflow(&mut noverflow, new_b, hash);
        }
    }

    Rebuilt { arena, noverflow }
}
