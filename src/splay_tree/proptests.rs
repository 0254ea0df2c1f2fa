use super::{MissPolicy, SplayConfig, SplaySet};

use proptest::prelude::*;
use std::collections::BTreeSet;

#[derive(Clone, Debug)]
enum Op {
    Insert(u16),
    Remove(u16),
    Search(u16),
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    // A narrow key range so removals and repeated inserts usually hit.
    let key = 0u16..128;
    let op = prop_oneof![
        50 => key.clone().prop_map(Op::Insert),
        25 => key.clone().prop_map(Op::Remove),
        25 => key.prop_map(Op::Search),
    ];
    prop::collection::vec(op, 0..=500)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_with_btreeset(ops in ops_strategy()) {
        let mut set = SplaySet::new();
        let mut expected = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(key) => {
                    prop_assert_eq!(set.insert(key), expected.insert(key));
                    prop_assert_eq!(set.root(), Some(&key));
                }
                Op::Remove(key) => {
                    let removed = expected.remove(&key);
                    prop_assert_eq!(set.remove(&key), if removed { Some(key) } else { None });
                }
                Op::Search(key) => {
                    let found = set.search(&key).copied();
                    prop_assert_eq!(found, expected.get(&key).copied());
                    if found.is_some() {
                        prop_assert_eq!(set.root(), Some(&key));
                    }
                }
            }

            prop_assert_eq!(set.len(), expected.len());
            prop_assert_eq!(set.validate(), Ok(()));
        }

        let got: Vec<u16> = set.iter().copied().collect();
        let want: Vec<u16> = expected.into_iter().collect();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn prop_insert_is_idempotent(keys in prop::collection::vec(0u16..64, 0..=200)) {
        let mut once = SplaySet::new();
        let mut twice = SplaySet::new();
        for key in &keys {
            once.insert(*key);
            twice.insert(*key);
            twice.insert(*key);
        }

        prop_assert_eq!(once.len(), twice.len());
        prop_assert!(once.iter().eq(twice.iter()));
        prop_assert_eq!(twice.validate(), Ok(()));
    }

    #[test]
    fn prop_leave_unchanged_miss_keeps_shape(
        keys in prop::collection::vec(0u16..64, 1..=100),
        probe in 64u16..128,
    ) {
        let config = SplayConfig::new(32, MissPolicy::LeaveUnchanged);
        let mut set = SplaySet::with_config(config);
        set.extend(keys);

        let root = set.root().copied();
        prop_assert_eq!(set.search(&probe), None);
        prop_assert_eq!(set.remove(&probe), None);
        prop_assert_eq!(set.root().copied(), root);
        prop_assert_eq!(set.validate(), Ok(()));
    }
}
