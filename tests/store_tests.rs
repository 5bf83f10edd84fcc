//! Tests for Store
//!
//! These tests verify:
//! - Construction and open/closed lifecycle
//! - Point operations (put/get/remove/contains/size/clear/is_empty)
//! - Bulk reads (keys/key_set/values/entries)
//! - Table create/drop
//! - Concurrent operations on one handle

use std::collections::HashSet;
use std::sync::Arc;

use kvsql::{Config, KvError, Store};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::task::JoinSet;

// =============================================================================
// Helper Functions
// =============================================================================

async fn setup_memory_store() -> Store<String, Value> {
    let mut store = Store::with_config(Config::in_memory(), "cache", "kv").unwrap();
    store.initialize().await.unwrap();
    store
}

fn disk_config(temp_dir: &TempDir) -> Config {
    Config::builder().data_dir(temp_dir.path()).build()
}

fn k(s: &str) -> String {
    s.to_string()
}

// =============================================================================
// Construction Tests
// =============================================================================

#[test]
fn test_new_rejects_empty_db_name() {
    let result = Store::<String, Value>::new("", "kv");
    assert!(matches!(result, Err(KvError::InvalidArgument(_))));
}

#[test]
fn test_new_rejects_empty_table_name() {
    let result = Store::<String, Value>::new("cache", "");
    assert!(matches!(result, Err(KvError::InvalidArgument(_))));
}

#[test]
fn test_new_is_closed() {
    let store = Store::<String, Value>::new("cache", "kv").unwrap();
    assert!(!store.is_open());
    assert_eq!(store.db_name(), "cache");
    assert_eq!(store.table_name(), "kv");
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_initialize_opens_store() {
    let store = setup_memory_store().await;
    assert!(store.is_open());
    assert!(store.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_initialize_creates_database_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut store: Store<String, Value> = Store::with_config(disk_config(&temp_dir), "cache", "kv").unwrap();
    store.initialize().await.unwrap();

    assert!(temp_dir.path().join("cache.db").exists());
}

#[tokio::test]
async fn test_operations_before_initialize_fail_not_open() {
    let store: Store<String, Value> = Store::with_config(Config::in_memory(), "cache", "kv").unwrap();

    let err = store.put(&k("a"), &json!(1)).await.unwrap_err();
    assert!(err.is_not_open());
    assert!(store.get(&k("a")).await.unwrap_err().is_not_open());
    assert!(store.size().await.unwrap_err().is_not_open());
    assert!(store.keys().await.unwrap_err().is_not_open());
    assert!(store.clear().await.unwrap_err().is_not_open());
}

#[tokio::test]
async fn test_operations_after_close_fail_not_open() {
    let temp_dir = TempDir::new().unwrap();
    let mut store: Store<String, Value> = Store::with_config(disk_config(&temp_dir), "cache", "kv").unwrap();
    store.initialize().await.unwrap();
    store.put(&k("a"), &json!(1)).await.unwrap();

    store.close();
    assert!(!store.is_open());

    let err = store.put(&k("b"), &json!(2)).await.unwrap_err();
    assert!(matches!(err, KvError::NotOpen { ref table } if table == "kv"));

    // Reopen: the rejected put left no trace
    store.initialize().await.unwrap();
    assert_eq!(store.size().await.unwrap(), 1);
    assert!(!store.contains_key(&k("b")).await.unwrap());
}

#[tokio::test]
async fn test_data_persists_across_reopen() {
    let temp_dir = TempDir::new().unwrap();

    {
        let mut store: Store<String, Value> = Store::with_config(disk_config(&temp_dir), "cache", "kv").unwrap();
        store.initialize().await.unwrap();
        store.put(&k("persist"), &json!({"x": [1, 2]})).await.unwrap();
        store.close();
    }

    let mut store: Store<String, Value> = Store::with_config(disk_config(&temp_dir), "cache", "kv").unwrap();
    store.initialize().await.unwrap();
    assert_eq!(store.get(&k("persist")).await.unwrap(), Some(json!({"x": [1, 2]})));
}

#[tokio::test]
async fn test_initialize_twice_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let mut store: Store<String, Value> = Store::with_config(disk_config(&temp_dir), "cache", "kv").unwrap();
    store.initialize().await.unwrap();
    store.put(&k("a"), &json!(1)).await.unwrap();

    store.initialize().await.unwrap();
    assert_eq!(store.size().await.unwrap(), 1);
}

#[tokio::test]
async fn test_initialize_unreachable_storage() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not_a_dir");
    std::fs::write(&blocker, b"file").unwrap();

    let config = Config::builder().data_dir(&blocker).build();
    let mut store: Store<String, Value> = Store::with_config(config, "cache", "kv").unwrap();

    let err = store.initialize().await.unwrap_err();
    assert!(matches!(err, KvError::StorageUnavailable { .. }));
    assert!(!store.is_open());
}

#[tokio::test]
async fn test_initialize_failure_leaves_store_closed() {
    // SQLite reserves the sqlite_ prefix, so table creation fails
    let mut store: Store<String, Value> = Store::with_config(Config::in_memory(), "cache", "sqlite_kv").unwrap();

    let err = store.initialize().await.unwrap_err();
    assert!(matches!(err, KvError::Execution(_)));
    assert!(!store.is_open());

    let err = store.put(&k("a"), &json!(1)).await.unwrap_err();
    assert!(err.is_not_open());
}

#[tokio::test]
async fn test_connect_does_not_create_table() {
    let temp_dir = TempDir::new().unwrap();
    let mut store: Store<String, Value> = Store::with_config(disk_config(&temp_dir), "cache", "kv").unwrap();

    store.connect().unwrap();
    assert!(store.is_open());
    assert!(matches!(store.size().await, Err(KvError::Execution(_))));

    store.create_table().await.unwrap();
    store.put(&k("a"), &json!(1)).await.unwrap();
    assert_eq!(store.size().await.unwrap(), 1);
}

#[tokio::test]
async fn test_open_with_config_returns_usable_store() {
    let temp_dir = TempDir::new().unwrap();
    let store: Store<String, Value> = Store::open_with_config(disk_config(&temp_dir), "cache", "kv")
        .await
        .unwrap();

    assert!(store.is_open());
    store.put(&k("a"), &json!({"x": 1})).await.unwrap();
    assert_eq!(store.get(&k("a")).await.unwrap(), Some(json!({"x": 1})));
    assert!(temp_dir.path().join("cache.db").exists());
}

#[tokio::test]
async fn test_two_tables_in_one_database() {
    let temp_dir = TempDir::new().unwrap();
    let mut first: Store<String, Value> = Store::with_config(disk_config(&temp_dir), "shared", "one").unwrap();
    let mut second: Store<String, Value> = Store::with_config(disk_config(&temp_dir), "shared", "two").unwrap();
    first.initialize().await.unwrap();
    second.initialize().await.unwrap();

    first.put(&k("a"), &json!(1)).await.unwrap();

    assert_eq!(first.size().await.unwrap(), 1);
    assert_eq!(second.size().await.unwrap(), 0);
}

// =============================================================================
// Point Operation Tests
// =============================================================================

#[tokio::test]
async fn test_put_get() {
    let store = setup_memory_store().await;

    store.put(&k("hello"), &json!("world")).await.unwrap();

    assert_eq!(store.get(&k("hello")).await.unwrap(), Some(json!("world")));
}

#[tokio::test]
async fn test_get_nonexistent_key() {
    let store = setup_memory_store().await;
    assert_eq!(store.get(&k("nonexistent")).await.unwrap(), None);
}

#[tokio::test]
async fn test_get_distinguishes_absent_from_null() {
    let store = setup_memory_store().await;

    store.put(&k("nothing"), &Value::Null).await.unwrap();
    store.put(&k("zero"), &json!(0)).await.unwrap();
    store.put(&k("empty"), &json!("")).await.unwrap();

    assert_eq!(store.get(&k("nothing")).await.unwrap(), Some(Value::Null));
    assert_eq!(store.get(&k("zero")).await.unwrap(), Some(json!(0)));
    assert_eq!(store.get(&k("empty")).await.unwrap(), Some(json!("")));
    assert_eq!(store.get(&k("missing")).await.unwrap(), None);
}

#[tokio::test]
async fn test_put_overwrite() {
    let store = setup_memory_store().await;

    store.put(&k("key"), &json!("value1")).await.unwrap();
    store.put(&k("key"), &json!("value2")).await.unwrap();

    assert_eq!(store.get(&k("key")).await.unwrap(), Some(json!("value2")));
    assert_eq!(store.size().await.unwrap(), 1);
}

#[tokio::test]
async fn test_put_composite_values() {
    let store = setup_memory_store().await;
    let nested = json!({"name": "n", "tags": ["a", "b"], "inner": {"depth": 2, "ok": true}});

    store.put(&k("nested"), &nested).await.unwrap();

    assert_eq!(store.get(&k("nested")).await.unwrap(), Some(nested));
}

#[tokio::test]
async fn test_remove() {
    let store = setup_memory_store().await;

    store.put(&k("key"), &json!(1)).await.unwrap();
    assert!(store.contains_key(&k("key")).await.unwrap());

    store.remove(&k("key")).await.unwrap();
    assert!(!store.contains_key(&k("key")).await.unwrap());
    assert_eq!(store.get(&k("key")).await.unwrap(), None);
}

#[tokio::test]
async fn test_remove_nonexistent_key() {
    let store = setup_memory_store().await;
    store.put(&k("kept"), &json!(1)).await.unwrap();

    // Should not error
    store.remove(&k("nonexistent")).await.unwrap();
    assert_eq!(store.size().await.unwrap(), 1);
}

#[tokio::test]
async fn test_size_counts_distinct_keys() {
    let store = setup_memory_store().await;

    for i in 0..20 {
        store.put(&format!("key{}", i % 7), &json!(i)).await.unwrap();
    }

    assert_eq!(store.size().await.unwrap(), 7);
    assert_eq!(store.key_set().await.unwrap().len(), 7);
}

#[tokio::test]
async fn test_is_empty_tracks_size() {
    let store = setup_memory_store().await;
    assert!(store.is_empty().await.unwrap());
    assert_eq!(store.size().await.unwrap(), 0);

    store.put(&k("a"), &json!(1)).await.unwrap();
    assert!(!store.is_empty().await.unwrap());

    store.remove(&k("a")).await.unwrap();
    assert!(store.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_clear() {
    let store = setup_memory_store().await;
    for i in 0..5 {
        store.put(&format!("key{}", i), &json!(i)).await.unwrap();
    }

    store.clear().await.unwrap();

    assert_eq!(store.size().await.unwrap(), 0);
    assert!(store.keys().await.unwrap().is_empty());
    assert!(store.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_clear_empty_table() {
    let store = setup_memory_store().await;
    store.clear().await.unwrap();
    assert!(store.is_empty().await.unwrap());
}

// =============================================================================
// Bulk Read Tests
// =============================================================================

#[tokio::test]
async fn test_keys_and_values() {
    let store = setup_memory_store().await;
    store.put(&k("a"), &json!(1)).await.unwrap();
    store.put(&k("b"), &json!(2)).await.unwrap();
    store.put(&k("c"), &json!(3)).await.unwrap();

    let mut keys = store.keys().await.unwrap();
    keys.sort();
    assert_eq!(keys, vec![k("a"), k("b"), k("c")]);

    let mut values: Vec<i64> = store
        .values()
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.as_i64().unwrap())
        .collect();
    values.sort();
    assert_eq!(values, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_key_set() {
    let store = setup_memory_store().await;
    store.put(&k("x"), &json!(null)).await.unwrap();
    store.put(&k("y"), &json!(null)).await.unwrap();

    let expected: HashSet<String> = [k("x"), k("y")].into_iter().collect();
    assert_eq!(store.key_set().await.unwrap(), expected);
}

#[tokio::test]
async fn test_entries() {
    let store = setup_memory_store().await;
    store.put(&k("a"), &json!({"x": 1})).await.unwrap();
    store.put(&k("b"), &json!([1, 2, 3])).await.unwrap();

    let entries = store.entries().await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[&k("a")], json!({"x": 1}));
    assert_eq!(entries[&k("b")], json!([1, 2, 3]));
}

#[tokio::test]
async fn test_bulk_reads_on_empty_table() {
    let store = setup_memory_store().await;

    assert!(store.keys().await.unwrap().is_empty());
    assert!(store.key_set().await.unwrap().is_empty());
    assert!(store.values().await.unwrap().is_empty());
    assert!(store.entries().await.unwrap().is_empty());
}

// =============================================================================
// Table Tests
// =============================================================================

#[tokio::test]
async fn test_remove_table() {
    let store = setup_memory_store().await;
    store.put(&k("a"), &json!(1)).await.unwrap();

    store.remove_table().await.unwrap();

    // Table is gone: reads now fail in the engine
    assert!(matches!(store.size().await, Err(KvError::Execution(_))));

    // Dropping again fails, the table does not exist
    assert!(matches!(store.remove_table().await, Err(KvError::Execution(_))));

    // Recreate
    store.create_table().await.unwrap();
    assert_eq!(store.size().await.unwrap(), 0);
}

#[tokio::test]
async fn test_table_name_is_quoted() {
    let mut store: Store<String, Value> =
        Store::with_config(Config::in_memory(), "cache", "odd \"name\"; DROP").unwrap();
    store.initialize().await.unwrap();

    store.put(&k("a"), &json!(1)).await.unwrap();
    assert_eq!(store.get(&k("a")).await.unwrap(), Some(json!(1)));
}

#[tokio::test]
async fn test_open_default_rejects_empty_name() {
    let result = Store::<String, Value>::open_default("", "kv").await;
    assert!(matches!(result, Err(KvError::InvalidArgument(_))));
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[tokio::test]
async fn test_concurrent_puts_on_different_keys() {
    let store = setup_memory_store().await;

    let (a, b) = (k("a"), k("b"));
    let (one, two) = (json!(1), json!(2));
    let (first, second) = tokio::join!(store.put(&a, &one), store.put(&b, &two));
    first.unwrap();
    second.unwrap();

    assert_eq!(store.get(&k("a")).await.unwrap(), Some(json!(1)));
    assert_eq!(store.get(&k("b")).await.unwrap(), Some(json!(2)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_concurrent_puts_from_tasks() {
    let store = Arc::new(setup_memory_store().await);

    let mut tasks = JoinSet::new();
    for i in 0..32 {
        let store = Arc::clone(&store);
        tasks.spawn(async move { store.put(&format!("key{:02}", i), &json!(i)).await });
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap().unwrap();
    }

    assert_eq!(store.size().await.unwrap(), 32);
    assert_eq!(store.get(&k("key17")).await.unwrap(), Some(json!(17)));
}

// =============================================================================
// Scenario
// =============================================================================

#[tokio::test]
async fn test_cache_scenario() {
    let store = setup_memory_store().await;

    store.put(&k("a"), &json!({"x": 1})).await.unwrap();
    store.put(&k("b"), &json!([1, 2, 3])).await.unwrap();
    assert_eq!(store.get(&k("a")).await.unwrap(), Some(json!({"x": 1})));
    assert_eq!(store.size().await.unwrap(), 2);

    store.remove(&k("a")).await.unwrap();
    assert_eq!(store.get(&k("a")).await.unwrap(), None);
    assert_eq!(store.size().await.unwrap(), 1);

    store.clear().await.unwrap();
    assert!(store.is_empty().await.unwrap());
}
