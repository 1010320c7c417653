//! File-backed persistence: WAL mode, reopen, read pool visibility, migrations.

use strata_core::capsule::NewCapsule;
use strata_core::config::StorageConfig;
use strata_core::traits::ICapsuleStorage;
use strata_storage::migrations::LATEST_VERSION;
use strata_storage::StorageEngine;

#[test]
fn file_backed_store_uses_wal() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StorageEngine::open(&dir.path().join("strata.db")).unwrap();
    assert!(engine.wal_enabled().unwrap());
    assert_eq!(engine.schema_version().unwrap(), LATEST_VERSION);
}

#[test]
fn in_memory_store_is_migrated() {
    let engine = StorageEngine::open_in_memory().unwrap();
    assert_eq!(engine.schema_version().unwrap(), LATEST_VERSION);
}

#[test]
fn writes_visible_through_read_pool() {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig {
        read_pool_size: 2,
        ..StorageConfig::default()
    };
    let engine = StorageEngine::open_with(&dir.path().join("strata.db"), &config).unwrap();
    let ids = engine
        .insert_capsules(&[(NewCapsule::new(1, "persisted", "chat"), vec![1.0])], "m")
        .unwrap();

    // Two reads hit both pooled readers.
    for _ in 0..2 {
        assert_eq!(
            engine.get_capsule(ids[0]).unwrap().unwrap().text,
            "persisted"
        );
    }
}

#[test]
fn data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("strata.db");
    let id = {
        let engine = StorageEngine::open(&path).unwrap();
        engine
            .insert_capsules(&[(NewCapsule::new(1, "durable", "profile"), vec![0.5, 0.5])], "m")
            .unwrap()[0]
    };

    let reopened = StorageEngine::open(&path).unwrap();
    assert_eq!(reopened.schema_version().unwrap(), LATEST_VERSION);
    let capsule = reopened.get_capsule(id).unwrap().unwrap();
    assert_eq!(capsule.text, "durable");
    assert_eq!(reopened.get_embedding(id).unwrap().unwrap().vector, vec![0.5, 0.5]);
}
