//! The bookmark data model.
//!
//! ## Whole-Set Replacement
//!
//! A `BookmarkSet` is never edited in place. Every sync computes the
//! full replacement set first and then swaps it in, so nothing can ever
//! observe a half-updated set. The map is small and writes are
//! user-driven, so each `replace` writes the whole map to storage.

use serde::Serialize;
use std::collections::BTreeMap;
use tokio::sync::broadcast;

use crate::document::DocumentId;
use crate::event::{BookmarkEvent, EventBus};
use crate::storage::{BookmarkStorage, StorageError};

/// Bookmarked lines of one document: strictly ascending, no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BookmarkSet(Vec<usize>);

impl BookmarkSet {
    /// Builds a set from arbitrary lines: sorts ascending, drops duplicates.
    pub fn from_lines(lines: impl IntoIterator<Item = usize>) -> Self {
        let mut lines: Vec<usize> = lines.into_iter().collect();
        lines.sort_unstable();
        lines.dedup();
        Self(lines)
    }

    pub fn lines(&self) -> &[usize] {
        &self.0
    }

    pub fn contains(&self, line: usize) -> bool {
        self.0.binary_search(&line).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Every document's bookmarks, keyed by identity.
pub type BookmarkMap = BTreeMap<DocumentId, BookmarkSet>;

static EMPTY: BookmarkSet = BookmarkSet(Vec::new());

/// Owner of all bookmark sets.
///
/// Writes through to its storage on every `replace` and fires
/// [`BookmarkEvent::Changed`] on every change.
pub struct BookmarkStore {
    sets: BookmarkMap,
    storage: Box<dyn BookmarkStorage>,
    events: EventBus,
}

impl BookmarkStore {
    /// Creates an empty store writing to `storage`.
    pub fn new(storage: impl BookmarkStorage + 'static) -> Self {
        Self {
            sets: BookmarkMap::new(),
            storage: Box::new(storage),
            events: EventBus::new(),
        }
    }

    /// Creates a store and loads everything `storage` holds.
    ///
    /// Unreadable storage starts the store empty; the next write
    /// overwrites it.
    pub fn open(storage: impl BookmarkStorage + 'static) -> Self {
        let mut store = Self::new(storage);
        match store.storage.load() {
            Ok(data) => store.load_all(data),
            Err(err) => tracing::warn!("Could not load bookmarks, starting empty: {}", err),
        }
        store
    }

    /// Installs `data` wholesale. No change signal is sent.
    pub fn load_all(&mut self, data: BookmarkMap) {
        tracing::debug!("Loaded bookmarks for {} documents", data.len());
        self.sets = data;
    }

    /// Returns the set for `id`, empty if none is recorded.
    pub fn get(&self, id: &DocumentId) -> &BookmarkSet {
        self.sets.get(id).unwrap_or(&EMPTY)
    }

    /// Returns true if `id` has a recorded, non-empty set.
    pub fn has_bookmarks(&self, id: &DocumentId) -> bool {
        !self.get(id).is_empty()
    }

    /// Returns true if `id` has an entry at all (possibly empty).
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.sets.contains_key(id)
    }

    /// Installs a new set for `id`, persists the whole map and notifies.
    pub fn replace(
        &mut self,
        id: &DocumentId,
        lines: impl IntoIterator<Item = usize>,
    ) -> &BookmarkSet {
        let set = BookmarkSet::from_lines(lines);
        tracing::debug!("Bookmarks for {}: {:?}", id, set.lines());
        self.sets.insert(id.clone(), set);

        if let Err(err) = self.flush() {
            tracing::warn!("Failed to persist bookmarks: {}", err);
        }
        self.events.emit(BookmarkEvent::Changed);

        self.get(id)
    }

    /// Forgets the set for `id` and notifies. Storage is not touched.
    pub fn clear(&mut self, id: &DocumentId) {
        if self.sets.remove(id).is_some() {
            tracing::debug!("Cleared cached bookmarks for {}", id);
        }
        self.events.emit(BookmarkEvent::Changed);
    }

    /// Writes the whole map to storage.
    pub fn flush(&self) -> Result<(), StorageError> {
        self.storage.save(&self.sets)
    }

    /// Iterates every document's set, ordered by identity.
    pub fn iter(&self) -> impl Iterator<Item = (&DocumentId, &BookmarkSet)> {
        self.sets.iter()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Subscribes to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<BookmarkEvent> {
        self.events.subscribe()
    }
}
