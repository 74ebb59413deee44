use bahasa_srs_core::{FixedClock, Grade, KeyValueStore, SrsEngine};
use bahasa_srs_json::JsonFileStore;
use chrono::NaiveDate;
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn values_survive_reopen() {
    let dir = tempdir().unwrap();
    {
        let store = JsonFileStore::open_in(dir.path().to_path_buf()).unwrap();
        store.set("a", "1").unwrap();
        store.set("b", "two").unwrap();
        store.remove("a").unwrap();
    }
    let store = JsonFileStore::open_in(dir.path().to_path_buf()).unwrap();
    assert_eq!(store.get("a").unwrap(), None);
    assert_eq!(store.get("b").unwrap().as_deref(), Some("two"));
}

#[test]
fn engine_progress_is_durable() {
    let dir = tempdir().unwrap();
    let clock = Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()));
    {
        let store = Arc::new(JsonFileStore::open_in(dir.path().to_path_buf()).unwrap());
        let engine = SrsEngine::new(store, clock.clone());
        engine.grade("makan", Grade::Easy);
    }
    let store = Arc::new(JsonFileStore::open_in(dir.path().to_path_buf()).unwrap());
    let engine = SrsEngine::new(store, clock);
    let p = engine.progress("makan").unwrap();
    assert_eq!(p.interval, 3);
    assert_eq!(p.repetitions, 1);
}

#[test]
fn corrupt_file_is_moved_aside() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bahasa-srs.json");
    fs::write(&path, "{ definitely not json").unwrap();

    let store = JsonFileStore::open_in(dir.path().to_path_buf()).unwrap();
    assert_eq!(store.get("anything").unwrap(), None);
    assert!(dir.path().join("bahasa-srs.json.corrupt").exists());

    store.set("k", "v").unwrap();
    let reopened = JsonFileStore::open_in(dir.path().to_path_buf()).unwrap();
    assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
}

#[test]
fn backups_are_capped() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::open_with(
        dir.path().join("store.json"),
        dir.path().join("backups"),
        2,
    )
    .unwrap();
    for i in 0..5 {
        store.set("k", &i.to_string()).unwrap();
    }
    let count = fs::read_dir(store.backups_dir()).unwrap().count();
    assert!((1..=2).contains(&count), "{count} backups kept");
}

#[test]
fn failed_write_leaves_memory_and_disk_unchanged() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    let backups = dir.path().join("backups");
    let store = JsonFileStore::open_with(path.clone(), backups.clone(), 3).unwrap();
    store.set("k", "v1").unwrap();
    store.set("gone", "x").unwrap();

    // a plain file where the backups directory should be makes every write fail
    fs::remove_dir_all(&backups).unwrap();
    fs::write(&backups, "in the way").unwrap();

    assert!(store.set("k", "v2").is_err());
    assert!(store.remove("gone").is_err());
    assert_eq!(store.get("k").unwrap().as_deref(), Some("v1"));
    assert_eq!(store.get("gone").unwrap().as_deref(), Some("x"));

    fs::remove_file(&backups).unwrap();
    let reopened = JsonFileStore::open_with(path, backups, 3).unwrap();
    assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v1"));
    assert_eq!(reopened.get("gone").unwrap().as_deref(), Some("x"));
}

#[test]
fn newest_backup_matches_live_file() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::open_with(
        dir.path().join("store.json"),
        dir.path().join("backups"),
        3,
    )
    .unwrap();
    for i in 0..4 {
        store.set("k", &i.to_string()).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    let mut names: Vec<_> = fs::read_dir(store.backups_dir())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    names.sort();
    assert_eq!(names.len(), 3);
    assert!(names
        .iter()
        .all(|p| p.file_name().unwrap().to_str().unwrap().starts_with("bahasa-srs-")));

    let newest = fs::read_to_string(names.last().unwrap()).unwrap();
    let live = fs::read_to_string(store.path()).unwrap();
    assert_eq!(newest, live);
}
