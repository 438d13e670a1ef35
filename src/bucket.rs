//! Bucket: a fixed group of 8 key/value slots.
//!
//! Slot emptiness is tracked only by the `occupied` bitmap. Hash and
//! top-hash fields of an empty slot are meaningless, so a key whose full
//! hash is zero is stored and found like any other.

use crate::hash::top_hash;

pub const BUCKET_SIZE: usize = 8;

#[derive(Debug)]
struct Entry<V> {
    key: Box<[u8]>,
    value: V,
}

/// The `occupied` bitmap is the slot marker every operation consults.
/// `entries[i]` is `Some` exactly when bit `i` is set; `put` and `vacate`
/// are the only writers and keep the two in step.
#[derive(Debug)]
pub(crate) struct Bucket<V> {
    occupied: u8,
    tophash: [u8; BUCKET_SIZE],
    hashes: [u64; BUCKET_SIZE],
    entries: [Option<Entry<V>>; BUCKET_SIZE],
}

impl<V> Bucket<V> {
    pub(crate) fn new() -> Self {
        Self {
            occupied: 0,
            tophash: [0; BUCKET_SIZE],
            hashes: [0; BUCKET_SIZE],
            entries: core::array::from_fn(|_| None),
        }
    }

    /// Occupancy count (0..=8).
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.occupied.count_ones() as usize
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.occupied == u8::MAX
    }

    #[inline]
    pub(crate) fn is_occupied(&self, slot: usize) -> bool {
        self.occupied & (1 << slot) != 0
    }

    #[inline]
    fn entry(&self, slot: usize) -> Option<&Entry<V>> {
        if !self.is_occupied(slot) {
            return None;
        }
        debug_assert!(self.entries[slot].is_some(), "slot {slot} marked but empty");
        self.entries[slot].as_ref()
    }

    #[inline]
    fn entry_mut(&mut self, slot: usize) -> Option<&mut Entry<V>> {
        if !self.is_occupied(slot) {
            return None;
        }
        debug_assert!(self.entries[slot].is_some(), "slot {slot} marked but empty");
        self.entries[slot].as_mut()
    }

    /// Slot holding `key`, comparing top byte, then full hash, then key bytes.
    pub(crate) fn find(&self, key: &[u8], hash: u64) -> Option<usize> {
        let top = top_hash(hash);
        (0..BUCKET_SIZE).find(|&i| {
            self.tophash[i] == top
                && self.hashes[i] == hash
                && self.entry(i).is_some_and(|e| &*e.key == key)
        })
    }

    /// First empty slot in index order.
    pub(crate) fn free_slot(&self) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        Some(self.occupied.trailing_ones() as usize)
    }

    /// Fill an empty slot.
    pub(crate) fn put(&mut self, slot: usize, key: Box<[u8]>, value: V, hash: u64) {
        debug_assert!(!self.is_occupied(slot), "slot {slot} already occupied");
        self.tophash[slot] = top_hash(hash);
        self.hashes[slot] = hash;
        self.entries[slot] = Some(Entry { key, value });
        self.occupied |= 1 << slot;
    }

    /// Clear a slot and hand back what it held.
    pub(crate) fn vacate(&mut self, slot: usize) -> Option<(Box<[u8]>, V)> {
        if !self.is_occupied(slot) {
            return None;
        }
        debug_assert!(self.entries[slot].is_some(), "slot {slot} marked but empty");
        self.occupied &= !(1 << slot);
        self.tophash[slot] = 0;
        self.hashes[slot] = 0;
        self.entries[slot].take().map(|e| (e.key, e.value))
    }

    pub(crate) fn value(&self, slot: usize) -> Option<&V> {
        self.entry(slot).map(|e| &e.value)
    }

    pub(crate) fn value_mut(&mut self, slot: usize) -> Option<&mut V> {
        self.entry_mut(slot).map(|e| &mut e.value)
    }

    /// Key and value of an occupied slot.
    pub(crate) fn key_value(&self, slot: usize) -> Option<(&[u8], &V)> {
        self.entry(slot).map(|e| (&*e.key, &e.value))
    }

    /// Move every live slot out as `(hash, key, value)`, leaving the bucket empty.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (u64, Box<[u8]>, V)> + '_ {
        (0..BUCKET_SIZE).filter_map(move |i| {
            let hash = self.hashes[i];
            self.vacate(i).map(|(k, v)| (hash, k, v))
        })
    }
}
