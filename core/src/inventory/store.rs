use crate::config::DraftConfig;
use crate::determinism::digest::sha256_hex;
use crate::error::{CoreError, CoreResult};
use crate::export::document::{build_srs_document, DocumentRenderer};
use crate::export::write_atomic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{info, warn};

use super::lock::{lock_path_for, InventoryLock};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionRecord {
    pub version: u32,
    pub filename: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

/// User id to that user's records, in version order.
pub type Inventory = BTreeMap<String, Vec<VersionRecord>>;

pub type Clock = fn() -> OffsetDateTime;

pub fn format_timestamp(at: OffsetDateTime) -> CoreResult<String> {
    at.format(format_description!("[year][month][day]_[hour][minute][second]"))
        .map_err(|e| CoreError::InvalidInput(format!("timestamp formatting: {}", e)))
}

/// User ids become directory names under the export root.
pub fn validate_user_id(user_id: &str) -> CoreResult<()> {
    let mut components = Path::new(user_id).components();
    let single_normal = matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none();
    if user_id.trim().is_empty()
        || user_id.contains('/')
        || user_id.contains('\\')
        || user_id.contains("..")
        || !single_normal
    {
        return Err(CoreError::InvalidInput(format!(
            "invalid user id '{}'",
            user_id
        )));
    }
    Ok(())
}

fn check_invariants(inventory: &Inventory) -> CoreResult<()> {
    for (user, records) in inventory {
        for (i, rec) in records.iter().enumerate() {
            if rec.version as usize != i + 1 {
                return Err(CoreError::InventoryCorruption(format!(
                    "user '{}' record {} has version {}",
                    user,
                    i + 1,
                    rec.version
                )));
            }
        }
    }
    Ok(())
}

pub struct InventoryStore {
    path: PathBuf,
    export_root: PathBuf,
    clock: Clock,
}

impl InventoryStore {
    pub fn new(path: impl AsRef<Path>, export_root: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            export_root: export_root.as_ref().to_path_buf(),
            clock: OffsetDateTime::now_utc,
        }
    }

    pub fn from_config(cfg: &DraftConfig) -> Self {
        Self::new(&cfg.inventory_path, &cfg.export_root)
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absent or empty store reads as an empty inventory. Anything else that
    /// cannot be read back is corruption, never a silent reset.
    pub fn load(&self) -> CoreResult<Inventory> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Inventory::new()),
            Err(e) => {
                return Err(CoreError::InventoryCorruption(format!(
                    "cannot read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        if raw.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Inventory::new());
        }
        let inventory: Inventory = serde_json::from_slice(&raw).map_err(|e| {
            CoreError::InventoryCorruption(format!("{}: {}", self.path.display(), e))
        })?;
        check_invariants(&inventory)?;
        Ok(inventory)
    }

    pub fn save(&self, inventory: &Inventory) -> CoreResult<()> {
        let mut bytes = serde_json::to_vec_pretty(inventory)?;
        bytes.push(b'\n');
        write_atomic(&self.path, &bytes)
    }

    pub fn document_path(&self, user_id: &str, version: u32, timestamp: &str, ext: &str) -> PathBuf {
        self.export_root
            .join(user_id)
            .join(format!("version_{}_{}.{}", version, timestamp, ext))
    }

    /// Writes the next numbered document for `user_id` and appends its record.
    /// Holds the store lock for the whole read-modify-write, so concurrent
    /// callers each get a distinct version.
    pub fn record_version(
        &self,
        user_id: &str,
        functional: &[String],
        non_functional: &[String],
        renderer: &dyn DocumentRenderer,
    ) -> CoreResult<VersionRecord> {
        validate_user_id(user_id)?;
        let _lock = InventoryLock::acquire(&lock_path_for(&self.path))?;

        let mut inventory = self.load()?;
        let records = inventory.entry(user_id.to_string()).or_default();
        let version = records.len() as u32 + 1;
        let timestamp = format_timestamp((self.clock)())?;
        let path = self.document_path(user_id, version, &timestamp, renderer.extension());

        let bytes = renderer.render(&build_srs_document(functional, non_functional))?;
        let record = VersionRecord {
            version,
            filename: path.to_string_lossy().into_owned(),
            timestamp,
            sha256: Some(sha256_hex(&bytes)),
        };
        write_atomic(&path, &bytes)?;
        records.push(record.clone());

        if let Err(e) = self.save(&inventory) {
            warn!(path = %path.display(), error = %e, "inventory write failed; removing document");
            let _ = fs::remove_file(&path);
            return Err(e);
        }
        info!(user = user_id, version, path = %path.display(), "version recorded");
        Ok(record)
    }

    pub fn history(&self, user_id: &str) -> CoreResult<Vec<VersionRecord>> {
        Ok(self.load()?.remove(user_id).unwrap_or_default())
    }

    pub fn record(&self, user_id: &str, version: u32) -> CoreResult<Option<VersionRecord>> {
        Ok(self
            .history(user_id)?
            .into_iter()
            .find(|r| r.version == version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn fixed_clock() -> OffsetDateTime {
        datetime!(2024-03-05 14:07:09 UTC)
    }

    #[test]
    fn timestamp_format() {
        assert_eq!(format_timestamp(fixed_clock()).unwrap(), "20240305_140709");
    }

    #[test]
    fn user_id_rules() {
        assert!(validate_user_id("alice").is_ok());
        assert!(validate_user_id("session-42").is_ok());
        for bad in ["", "  ", "a/b", "..", "a..b", "c:\\x", "/abs"] {
            assert!(
                matches!(validate_user_id(bad), Err(CoreError::InvalidInput(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn stored_json_keeps_field_names() {
        let rec = VersionRecord {
            version: 1,
            filename: "requirements/u/version_1_20240305_140709.docx".to_string(),
            timestamp: "20240305_140709".to_string(),
            sha256: None,
        };
        assert_eq!(
            serde_json::to_string(&rec).unwrap(),
            r#"{"version":1,"filename":"requirements/u/version_1_20240305_140709.docx","timestamp":"20240305_140709"}"#
        );
    }

    #[test]
    fn missing_and_empty_stores_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = InventoryStore::new(dir.path().join("inv.json"), dir.path());
        assert!(store.load().unwrap().is_empty());
        fs::write(store.path(), "  \n").unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn gaps_in_versions_are_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let store = InventoryStore::new(dir.path().join("inv.json"), dir.path());
        fs::write(
            store.path(),
            r#"{"u":[{"version":2,"filename":"f","timestamp":"t"}]}"#,
        )
        .unwrap();
        assert!(matches!(store.load(), Err(CoreError::InventoryCorruption(_))));
    }

    #[test]
    fn document_path_layout() {
        let store = InventoryStore::new("inv.json", "requirements").with_clock(fixed_clock);
        assert_eq!(
            store.document_path("u1", 3, "20240305_140709", "docx"),
            PathBuf::from("requirements/u1/version_3_20240305_140709.docx")
        );
    }
}
