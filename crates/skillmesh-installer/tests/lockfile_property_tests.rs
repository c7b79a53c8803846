//! Property-based tests for lockfile persistence

use proptest::prelude::*;
use tempfile::TempDir;

use skillmesh_installer::{Lockfile, LockfileEntry, LOCKFILE_NAME};

fn entry_strategy() -> impl Strategy<Value = LockfileEntry> {
    (
        "[a-z0-9][a-z0-9._-]{0,20}",
        "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}",
        "[a-f0-9]{8,40}",
    )
        .prop_map(|(name, version, content_id)| LockfileEntry {
            name,
            version,
            content_id,
        })
}

/// Property: whatever was upserted survives a save/load cycle unchanged
#[test]
fn prop_save_load_roundtrip_preserves_entries() {
    proptest!(|(entries in prop::collection::vec(entry_strategy(), 0..12))| {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(LOCKFILE_NAME);

        let mut lockfile = Lockfile::new();
        for entry in &entries {
            lockfile.upsert(entry.clone());
        }
        lockfile.save(&path).unwrap();

        let loaded = Lockfile::load(&path).unwrap().unwrap();
        prop_assert_eq!(loaded, lockfile);
    });
}

/// Property: entries stay name-sorted and unique regardless of upsert order
#[test]
fn prop_entries_are_sorted_and_unique() {
    proptest!(|(entries in prop::collection::vec(entry_strategy(), 0..12))| {
        let mut lockfile = Lockfile::new();
        for entry in &entries {
            lockfile.upsert(entry.clone());
        }

        for pair in lockfile.entries.windows(2) {
            prop_assert!(pair[0].name < pair[1].name);
        }
    });
}

/// Property: the last upsert for a name is the one that sticks
#[test]
fn prop_last_upsert_wins_per_name() {
    proptest!(|(entries in prop::collection::vec(entry_strategy(), 1..12))| {
        let mut lockfile = Lockfile::new();
        for entry in &entries {
            lockfile.upsert(entry.clone());
        }

        for entry in entries.iter().rev() {
            // The record stored under each name is the latest one upserted
            let stored = lockfile.get(&entry.name).unwrap();
            let last_for_name = entries
                .iter()
                .rev()
                .find(|e| e.name == entry.name)
                .unwrap();
            prop_assert_eq!(stored, last_for_name);
        }
    });
}
