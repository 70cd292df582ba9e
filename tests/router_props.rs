//! Property test: routing against a reference model.
//!
//! Drives a cache through random operation sequences and checks the
//! observable state against a flat map model. This covers the ownership
//! invariant (a key is served by exactly the store that last took it) and
//! index consistency across rebinds, removals, and clears.

use cachemux::prelude::*;
use proptest::prelude::*;
use std::collections::HashMap;

const KEYS: [&str; 4] = ["a", "b", "c", "d"];

#[derive(Debug, Clone)]
enum Op {
    Set(&'static str, i64, StoreKind),
    Remove(&'static str),
    RemoveAllIn(StoreKind),
    RemoveAll,
}

fn store_kind() -> impl Strategy<Value = StoreKind> {
    prop_oneof![
        Just(StoreKind::SessionScoped),
        Just(StoreKind::LocalPersistent),
        Just(StoreKind::InMemory),
    ]
}

fn key() -> impl Strategy<Value = &'static str> {
    prop::sample::select(&KEYS[..])
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        5 => (key(), any::<i64>(), store_kind()).prop_map(|(k, v, s)| Op::Set(k, v, s)),
        2 => key().prop_map(Op::Remove),
        1 => store_kind().prop_map(Op::RemoveAllIn),
        1 => Just(Op::RemoveAll),
    ]
}

proptest! {
    #[test]
    fn routing_matches_reference_model(ops in prop::collection::vec(op(), 1..50)) {
        let cache = CacheMux::ephemeral();
        let mut model: HashMap<&str, (StoreKind, i64)> = HashMap::new();

        for op in ops {
            match op {
                Op::Set(key, value, kind) => {
                    cache.set(key, value, kind).unwrap();
                    model.insert(key, (kind, value));
                }
                Op::Remove(key) => {
                    let existed = cache.remove(key).unwrap();
                    prop_assert_eq!(existed, model.remove(key).is_some());
                }
                Op::RemoveAllIn(kind) => {
                    cache.remove_all_in(kind).unwrap();
                    model.retain(|_, (owner, _)| *owner != kind);
                }
                Op::RemoveAll => {
                    cache.remove_all().unwrap();
                    model.clear();
                }
            }

            for key in KEYS {
                let expected = model.get(key).map(|(_, v)| Value::Int(*v));
                prop_assert_eq!(cache.get(key).unwrap(), expected);
                prop_assert_eq!(cache.exists(key).unwrap(), model.contains_key(key));
            }
            prop_assert_eq!(cache.len(), model.len());
        }
    }
}
