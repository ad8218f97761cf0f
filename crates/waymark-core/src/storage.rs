//! Durable storage for the bookmark map.
//!
//! ## Learning: Trait Objects at the Seam
//!
//! `BookmarkStore` holds a `Box<dyn BookmarkStorage>`, so the same store
//! can write to a JSON file in the binary and to memory in tests.
//!
//! ## File Layout
//!
//! One JSON object, document identity to ascending line numbers:
//!
//! ```json
//! { "/home/me/src/main.rs": [3, 17, 42] }
//! ```
//!
//! There is no version field. Loading is lenient: anything that is not a
//! non-negative integer inside an array is dropped with a warning rather
//! than failing the whole load.

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::document::DocumentId;
use crate::store::{BookmarkMap, BookmarkSet};

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable key-value storage for the whole bookmark map.
pub trait BookmarkStorage {
    /// Reads every stored set.
    fn load(&self) -> Result<BookmarkMap, StorageError>;

    /// Replaces the stored map with `map`.
    fn save(&self, map: &BookmarkMap) -> Result<(), StorageError>;
}

/// Stores bookmarks as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BookmarkStorage for JsonFileStorage {
    fn load(&self) -> Result<BookmarkMap, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No bookmark file at {}", self.path.display());
                return Ok(BookmarkMap::new());
            }
            Err(err) => return Err(err.into()),
        };

        let value: Value = serde_json::from_str(&content)?;
        Ok(sanitize(value))
    }

    fn save(&self, map: &BookmarkMap) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Write to a temporary file first, then rename (atomic write)
        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, serde_json::to_string_pretty(map)?)?;
        std::fs::rename(&temp_path, &self.path)?;

        tracing::trace!("Saved {} bookmark sets to {}", map.len(), self.path.display());
        Ok(())
    }
}

/// In-memory storage. Clones share the same contents, so a test can keep
/// one handle and inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    data: Arc<Mutex<BookmarkMap>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-filled with `map`.
    pub fn with_data(map: BookmarkMap) -> Self {
        Self {
            data: Arc::new(Mutex::new(map)),
            saves: Arc::default(),
        }
    }

    /// Returns a copy of the stored map.
    pub fn snapshot(&self) -> BookmarkMap {
        self.data.lock().map(|data| data.clone()).unwrap_or_default()
    }

    /// Number of completed saves.
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|saves| *saves).unwrap_or_default()
    }
}

impl BookmarkStorage for MemoryStorage {
    fn load(&self) -> Result<BookmarkMap, StorageError> {
        Ok(self.snapshot())
    }

    fn save(&self, map: &BookmarkMap) -> Result<(), StorageError> {
        if let Ok(mut data) = self.data.lock() {
            *data = map.clone();
        }
        if let Ok(mut saves) = self.saves.lock() {
            *saves += 1;
        }
        Ok(())
    }
}

/// Converts untrusted JSON into a bookmark map, dropping invalid entries.
pub fn sanitize(value: Value) -> BookmarkMap {
    let Value::Object(entries) = value else {
        tracing::warn!("Bookmark data is not an object, ignoring it");
        return BookmarkMap::new();
    };

    let mut map = BTreeMap::new();
    for (key, lines) in entries {
        let Value::Array(lines) = lines else {
            tracing::warn!("Bookmarks for {} are not a list, dropping them", key);
            continue;
        };

        let valid: Vec<usize> = lines
            .iter()
            .filter_map(|line| {
                let parsed = line.as_u64().and_then(|l| usize::try_from(l).ok());
                if parsed.is_none() {
                    tracing::warn!("Dropping invalid bookmark line {} for {}", line, key);
                }
                parsed
            })
            .collect();

        map.insert(DocumentId::new(key), BookmarkSet::from_lines(valid));
    }
    map
}
