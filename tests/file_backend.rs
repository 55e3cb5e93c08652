//! Durable file backend behavior: entry layout, atomicity discipline, and
//! idempotent invalidation.

mod support;

use serde_json::Value;
use tempfile::TempDir;

use support::sample_store;
use vetrina::cache::{FileCacheBackend, StoreCacheBackend, StoreCacheEntry};
use vetrina::domain::types::{IdentifierKind, StoreRef};

#[tokio::test]
async fn set_writes_an_id_entry_and_a_slug_reference() {
    let dir = TempDir::new().unwrap();
    let backend = FileCacheBackend::new(dir.path());
    let store = sample_store("s-1", Some("acme"));

    backend.set(&store).await.unwrap();

    let id_path = dir.path().join("id-s-1.json");
    let slug_path = dir.path().join("slug-acme.json");
    assert!(id_path.exists());
    assert!(slug_path.exists());

    // The slug file is a pointer record, never the payload.
    let raw: Value =
        serde_json::from_slice(&std::fs::read(&slug_path).unwrap()).unwrap();
    assert_eq!(raw["kind"], "reference");
    assert_eq!(raw["id"], "s-1");
    assert!(raw.get("settings").is_none());

    let id_raw: Value = serde_json::from_slice(&std::fs::read(&id_path).unwrap()).unwrap();
    assert_eq!(id_raw["kind"], "store");
    assert_eq!(id_raw["settings"]["currency"], "EUR");
}

#[tokio::test]
async fn get_round_trips_the_full_store() {
    let dir = TempDir::new().unwrap();
    let backend = FileCacheBackend::new(dir.path());
    let store = sample_store("s-1", Some("acme"));

    backend.set(&store).await.unwrap();

    let entry = backend.get("s-1", IdentifierKind::Id).await.unwrap();
    match entry {
        StoreCacheEntry::Store(cached) => assert_eq!(cached.store, store),
        StoreCacheEntry::Reference(_) => panic!("id entry must hold the payload"),
    }

    let slug_entry = backend.get("acme", IdentifierKind::Slug).await.unwrap();
    assert!(matches!(slug_entry, StoreCacheEntry::Reference(_)));
}

#[tokio::test]
async fn no_staging_files_survive_a_set() {
    let dir = TempDir::new().unwrap();
    let backend = FileCacheBackend::new(dir.path());

    backend.set(&sample_store("s-1", Some("acme"))).await.unwrap();
    backend.set(&sample_store("s-1", Some("acme"))).await.unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| {
            let name = entry.unwrap().file_name().to_string_lossy().into_owned();
            name.ends_with(".tmp").then_some(name)
        })
        .collect();
    assert!(leftovers.is_empty(), "staging files left behind: {leftovers:?}");
}

#[tokio::test]
async fn invalidate_removes_both_entries_and_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let backend = FileCacheBackend::new(dir.path());
    let store = sample_store("s-1", Some("acme"));

    backend.set(&store).await.unwrap();

    let target = StoreRef::from(&store);
    backend.invalidate(&target).await.unwrap();

    assert!(backend.get("s-1", IdentifierKind::Id).await.is_none());
    assert!(backend.get("acme", IdentifierKind::Slug).await.is_none());

    // Absent entries are not an error.
    backend.invalidate(&target).await.unwrap();
    backend.invalidate(&StoreRef::from_id("ghost")).await.unwrap();
}

#[tokio::test]
async fn set_creates_the_directory_when_absent() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("cache").join("stores");
    let backend = FileCacheBackend::new(&nested);

    backend.set(&sample_store("s-1", Some("acme"))).await.unwrap();
    assert!(nested.join("id-s-1.json").exists());
}

#[tokio::test]
async fn get_from_a_missing_directory_is_a_miss() {
    let dir = TempDir::new().unwrap();
    let backend = FileCacheBackend::new(dir.path().join("never-written"));

    assert!(backend.get("s-1", IdentifierKind::Id).await.is_none());
    assert!(backend.list_slugs().await.is_empty());
}

#[tokio::test]
async fn corrupt_entries_degrade_to_misses() {
    let dir = TempDir::new().unwrap();
    let backend = FileCacheBackend::new(dir.path());

    backend.set(&sample_store("s-1", Some("acme"))).await.unwrap();
    std::fs::write(dir.path().join("id-s-1.json"), b"{not json").unwrap();

    assert!(backend.get("s-1", IdentifierKind::Id).await.is_none());
}

#[tokio::test]
async fn list_slugs_ignores_everything_but_slug_entries() {
    let dir = TempDir::new().unwrap();
    let backend = FileCacheBackend::new(dir.path());

    backend.set(&sample_store("s-1", Some("acme"))).await.unwrap();
    backend.set(&sample_store("s-2", Some("globex"))).await.unwrap();
    backend.set(&sample_store("s-3", None)).await.unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"scratch").unwrap();

    let mut slugs = backend.list_slugs().await;
    slugs.sort();
    assert_eq!(slugs, vec!["acme".to_string(), "globex".to_string()]);
}

#[tokio::test]
async fn a_store_without_a_slug_writes_a_single_entry() {
    let dir = TempDir::new().unwrap();
    let backend = FileCacheBackend::new(dir.path());

    backend.set(&sample_store("s-9", None)).await.unwrap();

    assert!(dir.path().join("id-s-9.json").exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}
