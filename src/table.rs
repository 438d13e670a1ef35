//! BucketHashMap: public table over the bucket arena.

use crate::chain::{BucketArena, Entries};
use crate::error::{Error, Result};
use crate::growth::{self, Growth, Rebuilt};
use crate::hash::{bucket_index, KeyHasher, SeededHasher};

/// Largest accepted capacity hint.
pub const MAX_CAPACITY: i64 = 1 << 30;

/// String-keyed map over 8-slot buckets with overflow chains.
///
/// Keys are byte sequences (`&str`, `String`, `&[u8]`, ...). Growth runs to
/// completion inside the `set` call that triggers it.
pub struct BucketHashMap<V, H = SeededHasher> {
    hasher: H,
    pub(crate) arena: BucketArena<V>,
    count: usize,
    b: u8,
    noverflow: usize,
}

impl<V> BucketHashMap<V> {
    /// Empty map with one bucket and a random seed.
    pub fn new() -> Self {
        Self::with_capacity_and_hasher(0, SeededHasher::new())
            .unwrap_or_else(|_| unreachable!("zero capacity is always valid"))
    }

    /// Map sized so that `cap` entries fit without overflow buckets.
    ///
    /// Fails with [`Error::InvalidCapacity`] when `cap` is negative or above
    /// [`MAX_CAPACITY`].
    pub fn with_capacity(cap: i64) -> Result<Self> {
        Self::with_capacity_and_hasher(cap, SeededHasher::new())
    }
}

impl<V> Default for BucketHashMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over live entries in `BucketHashMap`.
pub struct Iter<'a, V> {
    it: Entries<'a, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a [u8], &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next()
    }
}

impl<V, H> BucketHashMap<V, H>
where
    H: KeyHasher,
{
    /// Like [`with_capacity`](BucketHashMap::with_capacity), hashing keys with `hasher`.
    pub fn with_capacity_and_hasher(cap: i64, hasher: H) -> Result<Self> {
        if !(0..=MAX_CAPACITY).contains(&cap) {
            return Err(Error::InvalidCapacity(cap));
        }
        let b = size_exponent_for(cap as u64);
        log::trace!("Creating map for capacity {cap}: b={b}");
        Ok(Self {
            hasher,
            arena: BucketArena::with_heads(b),
            count: 0,
            b,
            noverflow: 0,
        })
    }

    /// Store `value` under `key`, returning the value it replaced.
    pub fn set<K>(&mut self, key: K, value: V) -> Option<V>
    where
        K: AsRef<[u8]>,
    {
        if let Some(kind) = growth::growth_needed(self.count, self.b, self.noverflow) {
            self.grow(kind);
        }

        let key = key.as_ref();
        let hash = self.hasher.hash(key);
        let index = bucket_index(hash, self.b);
        if let Some(at) = self.arena.search(index, key, hash) {
            return self
                .arena
                .value_mut(at)
                .map(|slot| core::mem::replace(slot, value));
        }

        let placed = self.arena.insert_free(index, key.into(), value, hash);
        self.count += 1;
        if placed.new_overflow {
            growth::note_overflow(&mut self.noverflow, self.b, hash);
        }
        None
    }

    pub fn get<K>(&self, key: K) -> Option<&V>
    where
        K: AsRef<[u8]>,
    {
        let key = key.as_ref();
        let hash = self.hasher.hash(key);
        let at = self.arena.search(bucket_index(hash, self.b), key, hash)?;
        self.arena.value(at)
    }

    pub fn get_mut<K>(&mut self, key: K) -> Option<&mut V>
    where
        K: AsRef<[u8]>,
    {
        let key = key.as_ref();
        let hash = self.hasher.hash(key);
        let at = self.arena.search(bucket_index(hash, self.b), key, hash)?;
        self.arena.value_mut(at)
    }

    pub fn contains_key<K>(&self, key: K) -> bool
    where
        K: AsRef<[u8]>,
    {
        self.get(key).is_some()
    }

    /// Remove `key`, returning its value. Absent keys are a no-op.
    pub fn delete<K>(&mut self, key: K) -> Option<V>
    where
        K: AsRef<[u8]>,
    {
        let key = key.as_ref();
        let hash = self.hasher.hash(key);
        let (_, value) = self.arena.delete(bucket_index(hash, self.b), key, hash)?;
        self.count -= 1;
        Some(value)
    }

    /// Number of live entries.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            it: self.arena.iter(),
        }
    }

    /// Size exponent `b`: the map has `2^b` head buckets.
    pub fn size_exponent(&self) -> u8 {
        self.b
    }

    pub fn bucket_count(&self) -> usize {
        1 << self.b
    }

    /// Approximate overflow-bucket counter driving same-size growth.
    pub fn overflow_count(&self) -> usize {
        self.noverflow
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    fn grow(&mut self, kind: Growth) {
        let old_b = self.b;
        log::debug!(
            "Growing map ({kind:?}): b={old_b}, count={}, overflow={}",
            self.count,
            self.noverflow
        );

        let old = core::mem::replace(&mut self.arena, BucketArena::with_heads(0));
        let Rebuilt { arena, noverflow } = match kind {
            Growth::Double => {
                self.b += 1;
                growth::double(old, old_b)
            }
            Growth::SameSize => growth::same_size(old, old_b),
        };
        self.arena = arena;
        self.noverflow = noverflow;
        debug_assert_eq!(self.arena.live_slots(), self.count);

        log::debug!(
            "Grew map ({kind:?}): b={}, overflow={}",
            self.b,
            self.noverflow
        );
    }
}

impl<'a, V, H> IntoIterator for &'a BucketHashMap<V, H>
where
    H: KeyHasher,
{
    type Item = (&'a [u8], &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V, H> core::fmt::Debug for BucketHashMap<V, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BucketHashMap")
            .field("count", &self.count)
            .field("b", &self.b)
            .field("overflow", &self.noverflow)
            .field("overflow_buckets", &self.arena.overflow_buckets())
            .finish_non_exhaustive()
    }
}

/// Smallest `b` with `cap <= 2^(b+3)`.
fn size_exponent_for(cap: u64) -> u8 {
    let mut b = 0u8;
    while cap > 1u64 << (b + 3) {
        b += 1;
    }
    b
}
