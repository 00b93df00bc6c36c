//! Document persistence contracts and implementations.
//!
//! # Responsibility
//! - Load and save the whole planner document as one JSON value.
//! - Isolate file-system and serialization details from the service layer.
//!
//! # Invariants
//! - A missing backing file loads as the empty default document.
//! - Malformed content is surfaced as `StoreError::Parse`, never repaired.
//! - Saves rewrite the full document; there is no partial persistence.

use crate::model::document::Document;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod json_file;

pub use json_file::{JsonFileStore, MemoryStore, DEFAULT_DATA_FILE_NAME};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Serialize(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "planner data I/O failed: {err}"),
            Self::Parse(err) => write!(f, "planner data is malformed: {err}"),
            Self::Serialize(err) => write!(f, "planner data could not be serialized: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Whole-document persistence backend.
pub trait DocumentStore {
    fn load(&self) -> StoreResult<Document>;
    fn save(&self, document: &Document) -> StoreResult<()>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    fn load(&self) -> StoreResult<Document> {
        (**self).load()
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        (**self).save(document)
    }
}

fn decode_document(text: &str) -> StoreResult<Document> {
    serde_json::from_str(text).map_err(StoreError::Parse)
}

fn encode_document(document: &Document) -> StoreResult<String> {
    serde_json::to_string(document).map_err(StoreError::Serialize)
}
