/// End-to-end tests for the entry store and line cache
///
/// These tests verify complete workflows: insert → evict → publish index
mod common;

use std::fs;

use common::{FrozenClock, StorageDirBuilder, entry_files, index_lines, previews, stepping_store};
use scm::config::StoreConfig;
use scm::line_cache::write_index;
use scm::models::EntryId;
use scm::store::{EntryStore, InsertOutcome, RejectReason};

#[test]
fn test_e2e_capacity_three_scenario() {
    let dir = StorageDirBuilder::new().build();
    let mut store = stepping_store(dir.path(), StoreConfig::with_capacity(3), 1000);

    for text in ["alpha", "beta", "gamma", "delta"] {
        assert!(store.insert(text).unwrap().is_stored(), "{text} should be stored");
    }
    write_index(&store).unwrap();

    assert_eq!(previews(&store), vec!["beta", "gamma", "delta"]);
    assert_eq!(entry_files(dir.path()).len(), 3);

    let root = store.root().display().to_string();
    assert_eq!(
        index_lines(dir.path()),
        vec![
            format!("{root}/E1003\tdelta"),
            format!("{root}/E1002\tgamma"),
            format!("{root}/E1001\tbeta"),
        ]
    );
}

#[test]
fn test_bound_invariant_holds_after_every_insert() {
    let dir = StorageDirBuilder::new().build();
    let capacity = 5;
    let mut store = stepping_store(dir.path(), StoreConfig::with_capacity(capacity), 1);

    for i in 0..40 {
        store.insert(&format!("selection number {i}")).unwrap();
        assert!(store.len() <= capacity, "store grew past capacity at insert {i}");
        assert!(entry_files(dir.path()).len() <= capacity);
    }
    assert_eq!(store.len(), capacity);
}

#[test]
fn test_ids_unique_and_ascending() {
    let dir = StorageDirBuilder::new().build();
    let mut store = stepping_store(dir.path(), StoreConfig::with_capacity(8), 50);

    for i in 0..12 {
        store.insert(&format!("text {i}")).unwrap();
    }

    let ids: Vec<_> = store.entries().iter().map(|e| e.id).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]), "ids must be strictly ascending: {ids:?}");
}

#[test]
fn test_eviction_takes_smallest_id_first() {
    let dir = StorageDirBuilder::new().build();
    let capacity = 4;
    let mut store = stepping_store(dir.path(), StoreConfig::with_capacity(capacity), 700);

    let mut stored = Vec::new();
    for i in 0..=capacity {
        if let InsertOutcome::Stored(entry) = store.insert(&format!("distinct {i}")).unwrap() {
            stored.push(entry);
        }
    }

    let first = &stored[0];
    assert_eq!(first.id, EntryId::new(700));
    assert!(store.get(first.id).is_none());
    assert!(!first.path.exists());
    for entry in &stored[1..] {
        assert!(store.get(entry.id).is_some());
    }
}

#[test]
fn test_duplicate_preview_leaves_store_unchanged() {
    let dir = StorageDirBuilder::new().build();
    let mut store = stepping_store(dir.path(), StoreConfig::default(), 10);

    let first = store.insert("fn main() {\n    println!(\"hi\");\n}").unwrap();
    let before = store.entries().to_vec();
    let files_before = entry_files(dir.path());

    let outcome = store.insert("fn main() {\n    todo!();\n}").unwrap();

    assert_eq!(
        outcome,
        InsertOutcome::Rejected(RejectReason::Duplicate { of: first.entry().unwrap().id })
    );
    assert_eq!(store.entries(), before.as_slice());
    assert_eq!(entry_files(dir.path()), files_before);
}

#[test]
fn test_same_second_insert_is_rejected_not_merged() {
    let dir = StorageDirBuilder::new().build();
    let mut store =
        EntryStore::with_clock(dir.path(), StoreConfig::default(), FrozenClock(1234)).unwrap();

    assert!(store.insert("first copy").unwrap().is_stored());
    let second = store.insert("second copy").unwrap();

    assert_eq!(
        second,
        InsertOutcome::Rejected(RejectReason::Collision { id: EntryId::new(1234) })
    );
    assert_eq!(store.len(), 1);
    assert_eq!(fs::read_to_string(dir.path().join("E1234")).unwrap(), "first copy");
}

#[test]
fn test_index_freshness_after_insert() {
    let dir = StorageDirBuilder::new().with_entry(100, "old one").with_entry(200, "old two").build();
    let mut store = stepping_store(dir.path(), StoreConfig::with_capacity(2), 300);

    store.insert("brand new\nwith body").unwrap();
    write_index(&store).unwrap();

    let lines = index_lines(dir.path());
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("/E300\tbrand new (2 lines)"));
    assert!(lines[1].ends_with("/E200\told two"));
    assert!(!dir.path().join("E100").exists());
}

#[test]
fn test_external_deletion_between_scan_and_write() {
    let dir = StorageDirBuilder::new()
        .with_entry(1, "first")
        .with_entry(2, "second")
        .with_entry(3, "third")
        .build();
    let store = stepping_store(dir.path(), StoreConfig::default(), 10);

    fs::remove_file(dir.path().join("E2")).unwrap();
    write_index(&store).expect("vanished entries must not fail the index");

    let lines = index_lines(dir.path());
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("\tthird"));
    assert!(lines[1].ends_with("\tfirst"));
}

#[test]
fn test_rescan_after_external_deletion() {
    let dir = StorageDirBuilder::new().with_entry(1, "first").with_entry(2, "second").build();
    let mut store = stepping_store(dir.path(), StoreConfig::default(), 10);

    fs::remove_file(dir.path().join("E1")).unwrap();
    store.scan().unwrap();

    assert_eq!(previews(&store), vec!["second"]);
}

#[test]
fn test_retain_mode_excludes_but_keeps_files() {
    let dir = StorageDirBuilder::new().build();
    let config = StoreConfig { capacity: 2, retain_on_evict: true, ..StoreConfig::default() };
    let mut store = stepping_store(dir.path(), config.clone(), 1);

    for text in ["one", "two", "three", "four"] {
        store.insert(text).unwrap();
    }
    write_index(&store).unwrap();

    assert_eq!(previews(&store), vec!["three", "four"]);
    assert_eq!(entry_files(dir.path()).len(), 4);
    assert_eq!(index_lines(dir.path()).len(), 2);

    // A fresh scan applies the same exclusion
    let rescanned = stepping_store(dir.path(), config, 100);
    assert_eq!(previews(&rescanned), vec!["three", "four"]);
    assert_eq!(entry_files(dir.path()).len(), 4);
}

#[test]
fn test_history_survives_restart() {
    let dir = StorageDirBuilder::new().build();
    {
        let mut store = stepping_store(dir.path(), StoreConfig::default(), 10);
        store.insert("before restart").unwrap();
        store.insert("also before").unwrap();
    }

    let mut store = stepping_store(dir.path(), StoreConfig::default(), 20);
    assert_eq!(previews(&store), vec!["before restart", "also before"]);

    // Duplicates are detected against entries loaded from disk
    let outcome = store.insert("before restart").unwrap();
    assert!(matches!(outcome, InsertOutcome::Rejected(RejectReason::Duplicate { .. })));
}

#[test]
fn test_smaller_capacity_on_restart_trims_oldest() {
    let dir = StorageDirBuilder::new().build();
    {
        let mut store = stepping_store(dir.path(), StoreConfig::with_capacity(10), 1);
        for i in 0..6 {
            store.insert(&format!("entry {i}")).unwrap();
        }
    }

    let store = stepping_store(dir.path(), StoreConfig::with_capacity(2), 100);
    assert_eq!(previews(&store), vec!["entry 4", "entry 5"]);
    assert_eq!(entry_files(dir.path()).len(), 2);
}
