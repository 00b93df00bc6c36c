//! JSON file and in-memory document stores.
//!
//! # Responsibility
//! - Read/write `planner_data.json` as a single JSON object.
//! - Emit `store_load` / `store_save` events with duration and status.
//!
//! # Invariants
//! - `save` overwrites the file in place. No temp file, no fsync, no lock:
//!   concurrent writers race and the last write wins.

use super::{decode_document, encode_document, DocumentStore, StoreResult};
use crate::model::document::Document;
use log::{error, info};
use std::cell::RefCell;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Backing file name used when no explicit path is configured.
pub const DEFAULT_DATA_FILE_NAME: &str = "planner_data.json";

/// Store backed by one JSON file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> StoreResult<Document> {
        let started_at = Instant::now();

        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=store_load module=store status=ok mode=file source=default duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                return Ok(Document::default());
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error mode=file duration_ms={} error_code=read_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        match decode_document(&text) {
            Ok(document) => {
                info!(
                    "event=store_load module=store status=ok mode=file source=file duration_ms={} plans={} subjects={}",
                    started_at.elapsed().as_millis(),
                    document.finance.len(),
                    document.learning.len()
                );
                Ok(document)
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error mode=file duration_ms={} error_code=parse_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        let started_at = Instant::now();
        let text = encode_document(document)?;

        if let Err(err) = std::fs::write(&self.path, text.as_bytes()) {
            error!(
                "event=store_save module=store status=error mode=file duration_ms={} error_code=write_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }

        info!(
            "event=store_save module=store status=ok mode=file duration_ms={} bytes={}",
            started_at.elapsed().as_millis(),
            text.len()
        );
        Ok(())
    }
}

/// In-process store that keeps the serialized JSON text.
///
/// Goes through the same encode/decode path as `JsonFileStore`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    text: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with raw JSON text, as if read from a file.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: RefCell::new(Some(text.into())),
        }
    }

    /// Last saved (or seeded) JSON text.
    pub fn text(&self) -> Option<String> {
        self.text.borrow().clone()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> StoreResult<Document> {
        match self.text.borrow().as_deref() {
            Some(text) => decode_document(text),
            None => Ok(Document::default()),
        }
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        let text = encode_document(document)?;
        *self.text.borrow_mut() = Some(text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentStore, JsonFileStore, MemoryStore};
    use crate::model::document::Document;
    use crate::store::StoreError;

    #[test]
    fn missing_file_loads_default_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("planner_data.json"));

        let document = store.load().unwrap();
        assert_eq!(document, Document::default());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner_data.json");
        std::fs::write(&path, "{\"finance\": [").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)), "unexpected error: {err}");
    }

    #[test]
    fn save_writes_both_top_level_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner_data.json");
        JsonFileStore::new(&path)
            .save(&Document::default())
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"finance": [], "learning": {}}));
    }

    #[test]
    fn memory_store_starts_empty_and_keeps_saved_text() {
        let store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), Document::default());
        assert!(store.text().is_none());

        store.save(&Document::default()).unwrap();
        assert_eq!(
            store.text().as_deref(),
            Some("{\"finance\":[],\"learning\":{}}")
        );
    }
}
