//! ColumnStore contract tests
//!
//! The same suite runs against every backend. Tests verify:
//! - set / get / overwrite
//! - Ordered get_key and get_keys
//! - Column and key deletion, including the error policies
//! - Bounded and open-ended slices
//! - Persistence through the operation log

use std::collections::HashSet;

use keycolval::{ColumnStore, HashColumnStore, KcvError, LogSyncStrategy, TreeColumnStore};
use tempfile::TempDir;

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(c, v)| (c.to_string(), v.to_string()))
        .collect()
}

fn keys(items: &[&str]) -> HashSet<String> {
    items.iter().map(|k| k.to_string()).collect()
}

macro_rules! store_contract_tests {
    ($module:ident, $store:ty) => {
        mod $module {
            use super::*;

            fn new_store() -> $store {
                <$store>::new()
            }

            fn open_store(dir: &TempDir) -> $store {
                <$store>::open(dir.path().join("store.log")).unwrap()
            }

            /// set(a,aa,x) ... set(d,df,x)
            fn seeded_store() -> $store {
                let mut store = new_store();
                store.set("a", "aa", "x").unwrap();
                store.set("a", "ab", "x").unwrap();
                store.set("c", "cc", "x").unwrap();
                store.set("c", "cd", "x").unwrap();
                store.set("d", "de", "x").unwrap();
                store.set("d", "df", "x").unwrap();
                store
            }

            fn sliced_store() -> $store {
                let mut store = new_store();
                for column in ["ad", "ag", "ab", "af", "aa", "ae", "ac"] {
                    store.set("a", column, "x").unwrap();
                }
                store.set("b", "ba", "unrelated").unwrap();
                store
            }

            // =================================================================
            // Set / Get Tests
            // =================================================================

            #[test]
            fn test_set_then_get() {
                let mut store = new_store();
                store.set("a-key", "column-name", "my-little-value").unwrap();
                assert_eq!(store.get("a-key", "column-name"), Some("my-little-value"));
            }

            #[test]
            fn test_seeded_scenario() {
                let store = seeded_store();

                assert_eq!(store.get("a", "aa"), Some("x"));
                assert_eq!(store.get_key("a"), pairs(&[("aa", "x"), ("ab", "x")]));
                assert_eq!(store.get("z", "yy"), None);
                assert_eq!(store.get_key("z"), Vec::<(String, String)>::new());
            }

            #[test]
            fn test_get_missing_column_on_existing_key() {
                let store = seeded_store();
                assert_eq!(store.get("a", "zz"), None);
            }

            #[test]
            fn test_overwrite_scenario() {
                let mut store = seeded_store();

                store.set("a", "aa", "y").unwrap();
                store.set("a", "ab", "z").unwrap();
                assert_eq!(store.get("a", "aa"), Some("y"));
                assert_eq!(store.get_key("a"), pairs(&[("aa", "y"), ("ab", "z")]));

                store.delete("d", "df").unwrap();
                assert_eq!(store.get_key("d"), pairs(&[("de", "x")]));

                store.delete_key("c").unwrap();
                assert_eq!(store.get_key("c"), Vec::<(String, String)>::new());
            }

            #[test]
            fn test_repeated_set_keeps_last_value() {
                let mut store = new_store();
                for value in ["1", "2", "3"] {
                    store.set("k", "c", value).unwrap();
                }
                assert_eq!(store.get("k", "c"), Some("3"));
                assert_eq!(store.column_count("k"), 1);
            }

            #[test]
            fn test_values_may_contain_delimiters_without_log() {
                let mut store = new_store();
                store.set("k", "c", "a,b\nc").unwrap();
                assert_eq!(store.get("k", "c"), Some("a,b\nc"));
            }

            // =================================================================
            // Ordered Read Tests
            // =================================================================

            #[test]
            fn test_get_key_is_sorted() {
                let mut store = new_store();
                store.set("a-key", "column-b", "value-2").unwrap();
                store.set("a-key", "column-c", "value-3").unwrap();
                store.set("a-key", "column-a", "value-1").unwrap();
                store.set("a-key", "column-d", "value-4").unwrap();

                assert_eq!(
                    store.get_key("a-key"),
                    pairs(&[
                        ("column-a", "value-1"),
                        ("column-b", "value-2"),
                        ("column-c", "value-3"),
                        ("column-d", "value-4"),
                    ])
                );
            }

            #[test]
            fn test_get_keys() {
                let store = seeded_store();
                assert_eq!(store.get_keys(), keys(&["a", "c", "d"]));
            }

            #[test]
            fn test_empty_store() {
                let store = new_store();
                assert!(store.is_empty());
                assert!(store.get_keys().is_empty());
                assert_eq!(store.len(), 0);
            }

            #[test]
            fn test_counts() {
                let store = seeded_store();
                assert_eq!(store.len(), 6);
                assert_eq!(store.column_count("a"), 2);
                assert_eq!(store.column_count("z"), 0);
                assert!(store.contains_key("c"));
                assert!(!store.contains_key("z"));
            }

            // =================================================================
            // Delete Tests
            // =================================================================

            #[test]
            fn test_delete_column_leaves_siblings() {
                let mut store = new_store();
                store.set("a-key", "column-b", "value-2").unwrap();
                store.set("a-key", "column-c", "value-3").unwrap();
                store.set("a-key", "column-a", "value-1").unwrap();
                store.set("a-key", "column-d", "value-4").unwrap();

                store.delete("a-key", "column-c").unwrap();

                assert_eq!(store.get("a-key", "column-c"), None);
                assert_eq!(
                    store.get_key("a-key"),
                    pairs(&[
                        ("column-a", "value-1"),
                        ("column-b", "value-2"),
                        ("column-d", "value-4"),
                    ])
                );
                assert_eq!(
                    store.get_slice("a-key", Some("column-b"), None).unwrap(),
                    pairs(&[("column-b", "value-2"), ("column-d", "value-4")])
                );
            }

            #[test]
            fn test_delete_key_leaves_other_keys() {
                let mut store = new_store();
                store.set("a-key", "column-a1", "value-1").unwrap();
                store.set("a-key", "column-a2", "value-2").unwrap();
                store.set("b-key", "column-b1", "value-3").unwrap();
                store.set("b-key", "column-b2", "value-4").unwrap();

                store.delete_key("a-key").unwrap();

                assert_eq!(store.get_key("a-key"), Vec::<(String, String)>::new());
                assert_eq!(store.get("a-key", "column-a1"), None);
                assert_eq!(
                    store.get_key("b-key"),
                    pairs(&[("column-b1", "value-3"), ("column-b2", "value-4")])
                );
                assert_eq!(store.get_keys(), keys(&["b-key"]));
            }

            #[test]
            fn test_deleting_last_column_removes_key() {
                let mut store = seeded_store();
                store.delete("a", "aa").unwrap();
                store.delete("a", "ab").unwrap();

                assert!(!store.contains_key("a"));
                assert_eq!(store.get_keys(), keys(&["c", "d"]));
            }

            #[test]
            fn test_delete_missing_key_is_error() {
                let mut store = seeded_store();
                let err = store.delete("z", "aa").unwrap_err();
                assert!(matches!(err, KcvError::KeyNotFound(ref k) if k == "z"));
            }

            #[test]
            fn test_delete_missing_column_is_error() {
                let mut store = seeded_store();
                let err = store.delete("a", "zz").unwrap_err();
                assert!(matches!(
                    err,
                    KcvError::ColumnNotFound { ref key, ref column } if key == "a" && column == "zz"
                ));
                assert_eq!(store.column_count("a"), 2);
            }

            #[test]
            fn test_delete_key_missing_is_error() {
                let mut store = seeded_store();
                assert!(matches!(store.delete_key("z"), Err(KcvError::KeyNotFound(_))));
                assert_eq!(store.get_keys(), keys(&["a", "c", "d"]));
            }

            #[test]
            fn test_set_after_delete_key() {
                let mut store = seeded_store();
                store.delete_key("a").unwrap();
                store.set("a", "zz", "new").unwrap();
                assert_eq!(store.get_key("a"), pairs(&[("zz", "new")]));
            }

            // =================================================================
            // Slice Tests
            // =================================================================

            #[test]
            fn test_slice_closed() {
                let store = sliced_store();
                assert_eq!(
                    store.get_slice("a", Some("ac"), Some("ae")).unwrap(),
                    pairs(&[("ac", "x"), ("ad", "x"), ("ae", "x")])
                );
            }

            #[test]
            fn test_slice_open_end() {
                let store = sliced_store();
                assert_eq!(
                    store.get_slice("a", Some("ae"), None).unwrap(),
                    pairs(&[("ae", "x"), ("af", "x"), ("ag", "x")])
                );
            }

            #[test]
            fn test_slice_open_start() {
                let store = sliced_store();
                assert_eq!(
                    store.get_slice("a", None, Some("ac")).unwrap(),
                    pairs(&[("aa", "x"), ("ab", "x"), ("ac", "x")])
                );
            }

            #[test]
            fn test_slice_fully_open_equals_get_key() {
                let store = sliced_store();
                assert_eq!(store.get_slice("a", None, None).unwrap(), store.get_key("a"));
            }

            #[test]
            fn test_slice_single_column() {
                let store = sliced_store();
                assert_eq!(
                    store.get_slice("a", Some("ad"), Some("ad")).unwrap(),
                    pairs(&[("ad", "x")])
                );
            }

            #[test]
            fn test_slice_missing_key_is_empty() {
                let store = sliced_store();
                assert!(store.get_slice("z", Some("aa"), Some("ag")).unwrap().is_empty());
            }

            #[test]
            fn test_slice_empty_range() {
                let store = sliced_store();
                assert!(store.get_slice("a", Some("ah"), Some("az")).unwrap().is_empty());
            }

            #[test]
            fn test_slice_inverted_range_is_error() {
                let store = sliced_store();
                let err = store.get_slice("a", Some("ae"), Some("ac")).unwrap_err();
                assert!(matches!(err, KcvError::InvalidSlice { .. }));

                // Checked before the key lookup
                assert!(store.get_slice("z", Some("b"), Some("a")).is_err());
            }

            // =================================================================
            // Persistence Tests
            // =================================================================

            #[test]
            fn test_set_persists() {
                let dir = TempDir::new().unwrap();
                {
                    let mut store = open_store(&dir);
                    store.set("a-key", "my-column", "the-value").unwrap();
                    store.set("b-key", "other-column", "value").unwrap();
                }

                let store = open_store(&dir);
                assert_eq!(store.get("a-key", "my-column"), Some("the-value"));
                assert_eq!(store.get("b-key", "other-column"), Some("value"));
            }

            #[test]
            fn test_update_persists() {
                let dir = TempDir::new().unwrap();
                {
                    let mut store = open_store(&dir);
                    store.set("a-key", "my-column", "the-value").unwrap();
                    store.set("b-key", "other-column", "value").unwrap();
                    store.set("a-key", "my-column", "new-value").unwrap();
                }

                let store = open_store(&dir);
                assert_eq!(store.get("a-key", "my-column"), Some("new-value"));
                assert_eq!(store.get("b-key", "other-column"), Some("value"));
            }

            #[test]
            fn test_delete_persists() {
                let dir = TempDir::new().unwrap();
                {
                    let mut store = open_store(&dir);
                    store.set("a-key", "my-column", "the-value").unwrap();
                    store.set("a-key", "other-column", "value").unwrap();
                    store.delete("a-key", "my-column").unwrap();
                }

                let store = open_store(&dir);
                assert_eq!(store.get_key("a-key"), pairs(&[("other-column", "value")]));
            }

            #[test]
            fn test_delete_key_persists() {
                let dir = TempDir::new().unwrap();
                {
                    let mut store = open_store(&dir);
                    store.set("a-key", "my-column", "the-value").unwrap();
                    store.set("a-key", "other-column", "value").unwrap();
                    store.set("b-key", "b-column", "b-value").unwrap();
                    store.delete_key("a-key").unwrap();
                }

                let store = open_store(&dir);
                assert_eq!(store.get_key("a-key"), Vec::<(String, String)>::new());
                assert_eq!(store.get("b-key", "b-column"), Some("b-value"));
            }

            #[test]
            fn test_failed_mutations_are_not_logged() {
                let dir = TempDir::new().unwrap();
                {
                    let mut store = open_store(&dir);
                    store.set("a", "aa", "x").unwrap();
                    assert!(store.delete("a", "zz").is_err());
                    assert!(store.delete_key("z").is_err());
                    assert_eq!(store.oplog().unwrap().records_appended(), 1);
                }

                let store = open_store(&dir);
                assert_eq!(store.oplog().unwrap().replay_stats().records, 1);
                assert_eq!(store.get_key("a"), pairs(&[("aa", "x")]));
            }

            #[test]
            fn test_unloggable_value_is_rejected_and_not_applied() {
                let dir = TempDir::new().unwrap();
                let mut store = open_store(&dir);

                let err = store.set("a", "aa", "has,comma").unwrap_err();
                assert!(matches!(err, KcvError::UnloggableArgument(_)));
                assert_eq!(store.get("a", "aa"), None);
                assert!(store.is_empty());
            }

            #[test]
            fn test_logged_mutations_apply_under_every_sync_strategy() {
                for strategy in [
                    LogSyncStrategy::OsBuffered,
                    LogSyncStrategy::EveryWrite,
                    LogSyncStrategy::EveryNEntries { count: 2 },
                ] {
                    let dir = TempDir::new().unwrap();
                    let log_path = dir.path().join("store.log");
                    {
                        let mut store = <$store>::open_with(&log_path, strategy).unwrap();
                        store.set("a", "aa", "x").unwrap();
                        store.set("a", "ab", "y").unwrap();
                        store.delete("a", "aa").unwrap();

                        assert_eq!(store.get_key("a"), pairs(&[("ab", "y")]));
                        assert_eq!(store.oplog().unwrap().records_appended(), 3);
                    }

                    let store = <$store>::open(&log_path).unwrap();
                    assert_eq!(store.get_key("a"), pairs(&[("ab", "y")]));
                }
            }

            #[test]
            fn test_sync_and_close() {
                let dir = TempDir::new().unwrap();
                let mut store = open_store(&dir);
                store.set("a", "aa", "x").unwrap();
                store.sync_log().unwrap();
                store.close().unwrap();
            }

            #[test]
            fn test_sync_without_log_is_error() {
                let mut store = new_store();
                assert!(matches!(store.sync_log(), Err(KcvError::LogNotAttached)));
                // Closing a store without a log is still fine
                store.close().unwrap();
            }
        }
    };
}

store_contract_tests!(hash_store, HashColumnStore);
store_contract_tests!(tree_store, TreeColumnStore);

#[test]
fn test_backends_report_themselves() {
    use keycolval::Backend;

    assert_eq!(HashColumnStore::new().backend(), Backend::Hash);
    assert_eq!(TreeColumnStore::new().backend(), Backend::Tree);
}

#[test]
fn test_tree_store_exposes_column_tree() {
    let mut store = TreeColumnStore::new();
    for column in ["c1", "c2", "c3"] {
        store.set("k", column, "x").unwrap();
    }

    let tree = store.tree("k").unwrap();
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.depth(), 3);
    assert!(store.tree("missing").is_none());
}

#[test]
fn test_stores_usable_as_trait_objects() {
    let mut stores: Vec<Box<dyn ColumnStore>> =
        vec![Box::new(HashColumnStore::new()), Box::new(TreeColumnStore::new())];

    for store in stores.iter_mut() {
        store.set("k", "b", "2").unwrap();
        store.set("k", "a", "1").unwrap();
        assert_eq!(store.get_key("k"), pairs(&[("a", "1"), ("b", "2")]));
    }
}
