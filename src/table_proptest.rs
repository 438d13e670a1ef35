#![cfg(test)]

// Property tests for BucketHashMap kept inside the crate so they can check
// arena-level invariants alongside the public behavior.

use crate::hash::{KeyHasher, SeededHasher};
use crate::table::BucketHashMap;
use hashbrown::HashMap;
use proptest::prelude::*;

/// Seeded hash squeezed into a few distinct values (zero included) so that
/// chains, equal full hashes and growth are all hit with small key pools.
struct NarrowHasher {
    inner: SeededHasher,
    mask: u64,
}

impl KeyHasher for NarrowHasher {
    fn hash(&self, key: &[u8]) -> u64 {
        self.inner.hash(key) & self.mask
    }
    fn seed(&self) -> u64 {
        self.inner.seed()
    }
}

// Pool-indexed operations so shrinking moves toward earlier keys.
#[derive(Clone, Debug)]
enum Op {
    Set(usize, i32),
    Get(usize),
    Delete(usize),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z0-9]{0,4}", 1..=64).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Set(i, v)),
            2 => idx.clone().prop_map(Op::Get),
            2 => idx.clone().prop_map(Op::Delete),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..400).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn check_against_model<H: KeyHasher>(
    sut: &mut BucketHashMap<i32, H>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Vec<u8>, i32> = HashMap::new();
    for op in ops {
        match op {
            Op::Set(i, v) => {
                let k = pool[i].as_bytes();
                let prev = sut.set(k, v);
                prop_assert_eq!(prev, model.insert(k.to_vec(), v));
            }
            Op::Get(i) => {
                let k = pool[i].as_bytes();
                prop_assert_eq!(sut.get(k), model.get(k));
            }
            Op::Delete(i) => {
                let k = pool[i].as_bytes();
                prop_assert_eq!(sut.delete(k), model.remove(k));
            }
            Op::Iterate => {
                let mut seen: Vec<(Vec<u8>, i32)> =
                    sut.iter().map(|(k, v)| (k.to_vec(), *v)).collect();
                seen.sort();
                let mut expected: Vec<(Vec<u8>, i32)> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                expected.sort();
                prop_assert_eq!(seen, expected);
            }
        }
        prop_assert_eq!(sut.count(), model.len());
        prop_assert_eq!(sut.arena.live_slots(), model.len());
        prop_assert!(sut.overflow_count() <= sut.bucket_count());
    }
    for (k, v) in &model {
        prop_assert_eq!(sut.get(k), Some(v));
    }
    Ok(())
}

// Property: state-machine equivalence against hashbrown::HashMap.
// - `set` returns the displaced value and `delete` the removed one.
// - `get` agrees with the model for present and absent keys.
// - `count` and the arena's occupied slots both equal the model's len.
// - `iter` yields each live entry exactly once.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_state_machine_random_seed((pool, ops) in arb_scenario(), cap in 0i64..64) {
        let mut sut = BucketHashMap::with_capacity(cap).unwrap();
        check_against_model(&mut sut, &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_heavy_collisions((pool, ops) in arb_scenario(), seed in any::<u64>()) {
        let hasher = NarrowHasher {
            inner: SeededHasher::with_seed(seed),
            mask: 0x8000_0000_0000_0003,
        };
        let mut sut = BucketHashMap::with_capacity_and_hasher(0, hasher).unwrap();
        check_against_model(&mut sut, &pool, ops)?;
    }
}
