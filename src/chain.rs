//! BucketArena: head buckets and their overflow chains in one arena.
//!
//! Every bucket, head or overflow, lives in a `SlotMap`. A chain is linked
//! through `BucketId`s stored next to each bucket; `None` ends the chain.
//! Buckets are never unlinked individually: deletes only vacate slots, and
//! the whole arena is replaced by a growth pass.

use crate::bucket::{Bucket, BUCKET_SIZE};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub(crate) struct BucketId;
}

#[derive(Debug)]
struct Node<V> {
    bucket: Bucket<V>,
    overflow: Option<BucketId>,
}

/// Where a key was found: the chain node and the slot within it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct SlotRef {
    pub(crate) bucket: BucketId,
    pub(crate) slot: usize,
}

/// Outcome of placing an entry into a chain.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Placed {
    pub(crate) at: SlotRef,
    pub(crate) new_overflow: bool,
}

#[derive(Debug)]
pub(crate) struct BucketArena<V> {
    nodes: SlotMap<BucketId, Node<V>>,
    heads: Vec<BucketId>,
}

impl<V> BucketArena<V> {
    /// Arena with `2^b` empty head buckets.
    pub(crate) fn with_heads(b: u8) -> Self {
        let n = 1usize << b;
        let mut nodes = SlotMap::with_capacity_and_key(n);
        let heads = (0..n)
            .map(|_| {
                nodes.insert(Node {
                    bucket: Bucket::new(),
                    overflow: None,
                })
            })
            .collect();
        Self { nodes, heads }
    }

    pub(crate) fn head_count(&self) -> usize {
        self.heads.len()
    }

    pub(crate) fn head(&self, index: usize) -> BucketId {
        self.heads[index]
    }

    /// Exact number of overflow buckets currently allocated.
    pub(crate) fn overflow_buckets(&self) -> usize {
        self.nodes.len() - self.heads.len()
    }

    /// Chain node ids starting at `start`, in link order.
    pub(crate) fn chain(&self, start: BucketId) -> impl Iterator<Item = BucketId> + '_ {
        core::iter::successors(Some(start), move |&id| self.nodes[id].overflow)
    }

    /// Search the chain of head `index` node by node.
    pub(crate) fn search(&self, index: usize, key: &[u8], hash: u64) -> Option<SlotRef> {
        self.chain(self.heads[index]).find_map(|id| {
            self.nodes[id]
                .bucket
                .find(key, hash)
                .map(|slot| SlotRef { bucket: id, slot })
        })
    }

    /// Place an entry in the first free slot of the chain of head `index`,
    /// appending an overflow bucket when every bucket in it is full.
    pub(crate) fn insert_free(
        &mut self,
        index: usize,
        key: Box<[u8]>,
        value: V,
        hash: u64,
    ) -> Placed {
        let head = self.heads[index];
        self.insert_from(head, key, value, hash)
    }

    /// Like `insert_free` but starts the free-slot scan at chain node `from`.
    pub(crate) fn insert_from(
        &mut self,
        from: BucketId,
        key: Box<[u8]>,
        value: V,
        hash: u64,
    ) -> Placed {
        let mut id = from;
        loop {
            let node = &mut self.nodes[id];
            if let Some(slot) = node.bucket.free_slot() {
                node.bucket.put(slot, key, value, hash);
                return Placed {
                    at: SlotRef { bucket: id, slot },
                    new_overflow: false,
                };
            }
            match node.overflow {
                Some(next) => id = next,
                None => break,
            }
        }

        let mut bucket = Bucket::new();
        bucket.put(0, key, value, hash);
        let tail = self.nodes.insert(Node {
            bucket,
            overflow: None,
        });
        self.nodes[id].overflow = Some(tail);
        log::trace!("Allocated overflow bucket after {id:?}");
        Placed {
            at: SlotRef {
                bucket: tail,
                slot: 0,
            },
            new_overflow: true,
        }
    }

    /// Vacate the slot holding `key` in the chain of head `index`.
    pub(crate) fn delete(
        &mut self,
        index: usize,
        key: &[u8],
        hash: u64,
    ) -> Option<(Box<[u8]>, V)> {
        let at = self.search(index, key, hash)?;
        self.nodes[at.bucket].bucket.vacate(at.slot)
    }

    pub(crate) fn value(&self, at: SlotRef) -> Option<&V> {
        self.nodes.get(at.bucket)?.bucket.value(at.slot)
    }

    pub(crate) fn value_mut(&mut self, at: SlotRef) -> Option<&mut V> {
        self.nodes.get_mut(at.bucket)?.bucket.value_mut(at.slot)
    }

    /// Live entries across all chains, head order then chain order.
    pub(crate) fn iter(&self) -> Entries<'_, V> {
        Entries {
            arena: self,
            head: 0,
            node: None,
            slot: 0,
        }
    }

    /// Occupied slots across every chain.
    pub(crate) fn live_slots(&self) -> usize {
        self.nodes.values().map(|n| n.bucket.len()).sum()
    }

    /// Tear the arena down into `(head index, hash, key, value)` in chain order.
    pub(crate) fn into_entries(mut self) -> impl Iterator<Item = (usize, u64, Box<[u8]>, V)> {
        let mut out = Vec::with_capacity(self.live_slots());
        for (index, &head) in self.heads.iter().enumerate() {
            let mut next = Some(head);
            while let Some(id) = next {
                let node = &mut self.nodes[id];
                out.extend(node.bucket.drain().map(|(h, k, v)| (index, h, k, v)));
                next = node.overflow;
            }
        }
        out.into_iter()
    }
}

/// Cursor over live slots: next head to start, current chain node, next slot.
pub(crate) struct Entries<'a, V> {
    arena: &'a BucketArena<V>,
    head: usize,
    node: Option<BucketId>,
    slot: usize,
}

impl<'a, V> Iterator for Entries<'a, V> {
    type Item = (&'a [u8], &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        loop {
            let id = match self.node {
                Some(id) => id,
                None => {
                    let id = *arena.heads.get(self.head)?;
                    self.head += 1;
                    self.node = Some(id);
                    self.slot = 0;
                    id
                }
            };
            let node = &arena.nodes[id];
            while self.slot < BUCKET_SIZE {
                let slot = self.slot;
                self.slot += 1;
                if let Some(kv) = node.bucket.key_value(slot) {
                    return Some(kv);
                }
            }
            self.node = node.overflow;
            self.slot = 0;
        }
    }
}
