//! Property-Based Tests for the Cache Layer
//!
//! Uses proptest to verify the cache store and key policy invariants across
//! arbitrary keys, values, and operation sequences.

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;

use crate::cache::keys;
use crate::cache::memory::MemoryBackend;
use crate::cache::CacheStore;

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 1000;
const TEST_TTL: u64 = 300;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime")
}

fn test_store() -> CacheStore {
    CacheStore::new(
        Arc::new(MemoryBackend::new(TEST_MAX_ENTRIES)),
        Duration::from_millis(250),
    )
}

// == Strategies ==
/// Identifiers as the upstream id generators produce them
fn id_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,32}"
}

/// Arbitrary cacheable payload strings
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,256}"
}

/// A sequence of cache operations for statistics testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Del { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (id_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        id_strategy().prop_map(|key| CacheOp::Get { key }),
        id_strategy().prop_map(|key| CacheOp::Del { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // For all keys and values, set followed by get returns an equal value
    // until the TTL elapses.
    #[test]
    fn prop_round_trip(key in id_strategy(), value in value_strategy()) {
        runtime().block_on(async {
            let store = test_store();
            store.set(&key, &value, TEST_TTL).await;

            let read: Option<String> = store.get(&key).await;
            prop_assert_eq!(read, Some(value));
            Ok(())
        })?;
    }

    // del followed by get always returns absent, regardless of prior state.
    #[test]
    fn prop_delete_idempotent(key in id_strategy(), value in value_strategy(), was_set: bool) {
        runtime().block_on(async {
            let store = test_store();
            if was_set {
                store.set(&key, &value, TEST_TTL).await;
            }

            store.del(&key).await;
            let read: Option<String> = store.get(&key).await;
            prop_assert!(read.is_none());

            // A second delete is still fine
            store.del(&key).await;
            prop_assert_eq!(store.metrics().errors, 0);
            Ok(())
        })?;
    }

    // Pattern deletion removes every per-user variant of one class and
    // nothing outside that class's namespace.
    #[test]
    fn prop_pattern_delete_scoped(
        class_a in id_strategy(),
        class_b in id_strategy(),
        users in prop::collection::vec(id_strategy(), 1..8),
    ) {
        prop_assume!(class_a != class_b);

        runtime().block_on(async {
            let store = test_store();
            for user in &users {
                store.set(&keys::class_view(&class_a, user), &"a", TEST_TTL).await;
                store.set(&keys::class_view(&class_b, user), &"b", TEST_TTL).await;
            }

            store.del_pattern(&keys::class_views_pattern(&class_a)).await;

            for user in &users {
                let a: Option<String> = store.get(&keys::class_view(&class_a, user)).await;
                let b: Option<String> = store.get(&keys::class_view(&class_b, user)).await;
                prop_assert!(a.is_none());
                prop_assert_eq!(b, Some("b".to_string()));
            }
            Ok(())
        })?;
    }

    // Key builders are pure: the same identifiers always produce the same
    // key, and either id changing changes the key.
    #[test]
    fn prop_key_builders_deterministic(class_id in id_strategy(), user_id in id_strategy()) {
        let key = keys::class_view(&class_id, &user_id);
        prop_assert_eq!(&key, &keys::class_view(&class_id, &user_id));

        let expected_prefix = format!("class:{}:", class_id);
        let expected_suffix = format!(":user:{}", user_id);
        prop_assert!(key.starts_with(&expected_prefix), "prefix mismatch: {}", key);
        prop_assert!(key.ends_with(&expected_suffix), "suffix mismatch: {}", key);

        let pattern = keys::class_views_pattern(&class_id);
        prop_assert_eq!(pattern, format!("class:{}:user:*", class_id));
    }

    // For any operation sequence, the hit and miss counters reflect exactly
    // the observed get outcomes.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        runtime().block_on(async {
            let store = test_store();
            let mut expected_hits: u64 = 0;
            let mut expected_misses: u64 = 0;

            for op in ops {
                match op {
                    CacheOp::Set { key, value } => store.set(&key, &value, TEST_TTL).await,
                    CacheOp::Get { key } => {
                        let read: Option<String> = store.get(&key).await;
                        match read {
                            Some(_) => expected_hits += 1,
                            None => expected_misses += 1,
                        }
                    }
                    CacheOp::Del { key } => store.del(&key).await,
                }
            }

            let snap = store.metrics();
            prop_assert_eq!(snap.hits, expected_hits, "Hits mismatch");
            prop_assert_eq!(snap.misses, expected_misses, "Misses mismatch");
            prop_assert_eq!(snap.errors, 0, "No errors expected");
            Ok(())
        })?;
    }
}
