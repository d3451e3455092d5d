//! Durable local cart snapshot.
//!
//! A single named slot holds the last known cart as JSON. The slot is
//! read on load (as the fallback when the remote cart is unreachable or
//! empty) and written after every mutation, so a restart reconstructs
//! the same state.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use atlvs_core::{CartItem, RawCartItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the snapshot slot.
pub const SNAPSHOT_SLOT: &str = "atlvs-cart";

/// Errors that can occur reading or writing the snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Snapshot contents were not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable snapshot seam.
///
/// Items come back in the raw boundary shape: a snapshot edited or
/// corrupted on disk degrades per-record through the normalizer instead
/// of failing the whole read.
pub trait SnapshotStore: Send + Sync {
    /// Read the last written snapshot, if any.
    fn read(&self) -> Result<Option<Vec<RawCartItem>>, SnapshotError>;

    /// Replace the snapshot with the current items.
    fn write(&self, items: &[CartItem]) -> Result<(), SnapshotError>;
}

#[derive(Serialize)]
struct SnapshotFile<'a> {
    saved_at: DateTime<Utc>,
    items: &'a [CartItem],
}

#[derive(Deserialize)]
struct SnapshotContents {
    #[serde(default)]
    items: Vec<RawCartItem>,
}

/// [`SnapshotStore`] backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    /// Create a store writing to `<dir>/atlvs-cart.json`.
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{SNAPSHOT_SLOT}.json")),
        }
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn read(&self) -> Result<Option<Vec<RawCartItem>>, SnapshotError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let parsed: SnapshotContents = serde_json::from_str(&contents)?;
        Ok(Some(parsed.items))
    }

    fn write(&self, items: &[CartItem]) -> Result<(), SnapshotError> {
        let file = SnapshotFile {
            saved_at: Utc::now(),
            items,
        };
        let json = serde_json::to_string_pretty(&file)?;

        // Write-then-rename keeps a crash from truncating the only copy
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlvs_core::{CurrencyCode, ItemId, ItemType, normalize};

    fn item(id: &str, price: &str, quantity: u32) -> CartItem {
        CartItem {
            id: ItemId::new(id),
            name: id.to_string(),
            description: None,
            item_type: ItemType::Package,
            price: price.parse().expect("price"),
            currency: CurrencyCode::usd(),
            quantity,
            image: None,
            metadata: None,
        }
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSnapshotStore::new(dir.path());
        assert!(store.read().expect("read").is_none());
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSnapshotStore::new(dir.path());

        let items = vec![item("a", "10.00", 2), item("b", "3.50", 1)];
        store.write(&items).expect("write");

        let raw = store.read().expect("read").expect("snapshot present");
        let restored = normalize(raw, &CurrencyCode::usd());
        assert_eq!(restored, items);
    }

    #[test]
    fn test_write_replaces_previous_snapshot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSnapshotStore::new(dir.path());

        store.write(&[item("a", "10.00", 2)]).expect("write");
        store.write(&[item("b", "5.00", 1)]).expect("write");

        let raw = store.read().expect("read").expect("snapshot present");
        let restored = normalize(raw, &CurrencyCode::usd());
        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0].id, ItemId::new("b"));
    }

    #[test]
    fn test_corrupt_file_is_a_json_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSnapshotStore::new(dir.path());

        fs::write(dir.path().join("atlvs-cart.json"), "not json").expect("write");
        assert!(matches!(store.read(), Err(SnapshotError::Json(_))));
    }

    #[test]
    fn test_slot_file_name() {
        let store = FileSnapshotStore::new(Path::new("/tmp/data"));
        assert_eq!(store.path, Path::new("/tmp/data/atlvs-cart.json"));
    }
}
