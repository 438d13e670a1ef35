//! bucket-hashmap: a single-threaded, string-keyed hash map built directly
//! on 8-slot buckets, overflow chains and stop-the-world growth.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small hash map engine whose layout and growth policy are
//!   explicit and testable layer by layer.
//! - Layers:
//!   - KeyHasher / SeededHasher: seeded 64-bit hash over key bytes. The low
//!     `b` bits pick the head bucket; the top byte is a per-slot filter.
//!   - Bucket<V>: 8 slots plus an occupancy bitmap. Knows nothing about
//!     chains or the table.
//!   - BucketArena<V>: every bucket (head and overflow) in one `SlotMap`,
//!     chains linked by `BucketId`. Search, first-free insert and delete
//!     are confined to one head bucket and its chain.
//!   - growth: trigger predicates plus the doubling and same-size rebuilds.
//!   - BucketHashMap<V, H>: public API; hashes, dispatches, counts, grows.
//!
//! Constraints
//! - Single-threaded, in-memory. The default hasher keeps its streaming
//!   state in a `RefCell`, so the map is `!Sync`.
//! - Keys are byte sequences; values are any `V`.
//! - A key occupies exactly one slot, reachable from the head bucket at
//!   `hash & (2^b - 1)` by walking its chain in order.
//!
//! Slots and deletes
//! - Emptiness is the occupancy bitmap alone; a hash of zero is an ordinary
//!   hash.
//! - Deletes vacate a slot in place. Chains are never shortened by a delete;
//!   a later insert reuses the first vacated slot it finds. Repeated churn
//!   can leave long, sparse chains, which same-size growth repacks.
//!
//! Growth
//! - Checked before every `set` (overwrites included), never on `get` or
//!   `delete`.
//! - Doubling when `count + 1 > 6.5 * 2^b`: entries split on hash bit `b`
//!   into `i` or `i + 2^b`.
//! - Same-size when the approximate overflow counter reaches
//!   `min(2^b, 2^15)`: entries are repacked densely at the same index.
//! - Both passes run to completion inside the triggering `set`; the cost is
//!   `O(count + 2^b)` paid by that one call. An incremental,
//!   evacuate-on-access scheme would bound per-call latency instead.
//!
//! Notes and non-goals
//! - No generic keys, persistence or internal locking; wrap the map in a
//!   mutex to share it across threads.
//! - The only error is an invalid capacity hint at construction.

mod bucket;
mod chain;
pub mod error;
mod growth;
pub mod hash;
mod table;

#[cfg(test)]
mod table_proptest;

// Public surface
pub use bucket::BUCKET_SIZE;
pub use error::{Error, Result};
pub use growth::{LOAD_FACTOR_DEN, LOAD_FACTOR_NUM, MAX_OVERFLOW_EXPONENT};
pub use hash::{KeyHasher, SeededHasher};
pub use table::{BucketHashMap, Iter, MAX_CAPACITY};
