use reqdraft_core::error::CoreError;
use reqdraft_core::error::CoreResult;
use reqdraft_core::export::document::{DocumentRenderer, SrsDocument};
use reqdraft_core::export::docx::DocxRenderer;
use reqdraft_core::extraction::docx::extract_docx_text;
use reqdraft_core::inventory::store::InventoryStore;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use time::macros::datetime;
use time::OffsetDateTime;

fn frozen() -> OffsetDateTime {
    datetime!(2024-01-02 03:04:05 UTC)
}

fn store(root: &Path) -> InventoryStore {
    InventoryStore::new(root.join("inventory.json"), root.join("requirements")).with_clock(frozen)
}

fn reqs(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[test]
fn sequential_exports_number_from_one_without_gaps() {
    let dir = tempfile::tempdir().unwrap();
    let inv = store(dir.path());
    for n in 1..=3u32 {
        let rec = inv
            .record_version("alice", &reqs(&["Users must log in"]), &[], &DocxRenderer)
            .unwrap();
        assert_eq!(rec.version, n);
        assert_eq!(rec.timestamp, "20240102_030405");
        assert!(rec.filename.ends_with(&format!("version_{}_20240102_030405.docx", n)));
    }

    let history = inv.history("alice").unwrap();
    assert_eq!(history.iter().map(|r| r.version).collect::<Vec<_>>(), vec![1, 2, 3]);
    for rec in &history {
        let bytes = fs::read(&rec.filename).unwrap();
        assert!(extract_docx_text(&bytes).unwrap().contains("FR1: Users must log in"));
        assert_eq!(
            rec.sha256.as_deref(),
            Some(reqdraft_core::determinism::digest::sha256_hex(&bytes).as_str())
        );
    }
    assert_eq!(inv.record("alice", 2).unwrap().unwrap().version, 2);
    assert!(inv.record("alice", 9).unwrap().is_none());
}

#[test]
fn users_are_numbered_independently() {
    let dir = tempfile::tempdir().unwrap();
    let inv = store(dir.path());
    inv.record_version("alice", &[], &[], &DocxRenderer).unwrap();
    let bob = inv.record_version("bob", &[], &[], &DocxRenderer).unwrap();
    assert_eq!(bob.version, 1);
    assert!(Path::new(&bob.filename).starts_with(dir.path().join("requirements").join("bob")));
    assert!(inv.history("carol").unwrap().is_empty());
}

#[test]
fn store_round_trips_the_json_layout() {
    let dir = tempfile::tempdir().unwrap();
    let inv = store(dir.path());
    inv.record_version("u1", &[], &[], &DocxRenderer).unwrap();
    let v: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(inv.path()).unwrap()).unwrap();
    let rec = &v["u1"][0];
    assert_eq!(rec["version"], 1);
    assert_eq!(rec["timestamp"], "20240102_030405");
    assert!(rec["filename"].as_str().unwrap().ends_with("version_1_20240102_030405.docx"));
}

#[test]
fn concurrent_exports_get_distinct_versions() {
    let dir = tempfile::tempdir().unwrap();
    let root = Arc::new(dir.path().to_path_buf());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let root = Arc::clone(&root);
            thread::spawn(move || {
                store(&root)
                    .record_version("shared", &reqs(&["Users must log in"]), &[], &DocxRenderer)
                    .unwrap()
                    .version
            })
        })
        .collect();
    let mut versions: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    versions.sort();
    assert_eq!(versions, (1..=8).collect::<Vec<_>>());
    assert_eq!(store(&root).history("shared").unwrap().len(), 8);
}

#[test]
fn corrupt_store_fails_the_export_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let inv = store(dir.path());
    fs::write(inv.path(), "{not json").unwrap();

    let err = inv
        .record_version("alice", &reqs(&["A must B"]), &[], &DocxRenderer)
        .unwrap_err();
    assert!(matches!(err, CoreError::InventoryCorruption(_)));
    assert_eq!(fs::read_to_string(inv.path()).unwrap(), "{not json");
    assert!(!dir.path().join("requirements").join("alice").exists());
    assert!(matches!(inv.history("alice"), Err(CoreError::InventoryCorruption(_))));
}

struct BrokenRenderer;

impl DocumentRenderer for BrokenRenderer {
    fn extension(&self) -> &'static str {
        "docx"
    }

    fn render(&self, _doc: &SrsDocument) -> CoreResult<Vec<u8>> {
        Err(CoreError::Io(std::io::Error::other("disk full")))
    }
}

#[test]
fn failed_render_leaves_no_document_and_no_record() {
    let dir = tempfile::tempdir().unwrap();
    let inv = store(dir.path());
    inv.record_version("alice", &reqs(&["A must B"]), &[], &DocxRenderer).unwrap();

    assert!(inv
        .record_version("alice", &reqs(&["A must B"]), &[], &BrokenRenderer)
        .is_err());
    assert_eq!(inv.history("alice").unwrap().len(), 1);
    let docs = fs::read_dir(dir.path().join("requirements").join("alice"))
        .unwrap()
        .count();
    assert_eq!(docs, 1);

    let next = inv
        .record_version("alice", &reqs(&["A must B"]), &[], &DocxRenderer)
        .unwrap();
    assert_eq!(next.version, 2);
}

#[test]
fn unsafe_user_ids_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let inv = store(dir.path());
    for bad in ["../escape", "a/b", ""] {
        assert!(matches!(
            inv.record_version(bad, &[], &[], &DocxRenderer),
            Err(CoreError::InvalidInput(_))
        ));
    }
    assert!(!inv.path().exists());
}
