//! Keeps the bookmark store consistent with a live buffer's marks.
//!
//! ## Rebuild on Miss
//!
//! Line numbers are positional: an edit above a bookmark moves it. The
//! store does not try to track those shifts. Any edit or toggle simply
//! drops the cached set (`invalidate`), and the next query rescans the
//! buffer's marks (`ensure_fresh`). A cached set, even an empty one, is
//! trusted until it is invalidated.

use crate::document::DocumentId;
use crate::markers::LineMarkers;
use crate::store::{BookmarkSet, BookmarkStore};

/// Reconciles a [`BookmarkStore`] with [`LineMarkers`].
///
/// Holds no state of its own; it borrows the store for as long as it
/// lives and takes the buffer's markers per call.
pub struct SyncEngine<'a> {
    store: &'a mut BookmarkStore,
}

impl<'a> SyncEngine<'a> {
    pub fn new(store: &'a mut BookmarkStore) -> Self {
        Self { store }
    }

    /// Returns whether `id` has bookmarks, rescanning only on a miss.
    pub fn ensure_fresh<M>(&mut self, id: &DocumentId, markers: &M) -> bool
    where
        M: LineMarkers + ?Sized,
    {
        if self.store.contains(id) {
            return self.store.has_bookmarks(id);
        }
        !self.rebuild(id, markers).is_empty()
    }

    /// Rescans every marked line and installs the result.
    pub fn rebuild<M>(&mut self, id: &DocumentId, markers: &M) -> &BookmarkSet
    where
        M: LineMarkers + ?Sized,
    {
        let lines = markers.marked_lines();
        tracing::debug!("Rebuilt bookmarks for {} from {} marks", id, lines.len());
        self.store.replace(id, lines)
    }

    /// Drops the cached set for `id`; the next query rebuilds it.
    pub fn invalidate(&mut self, id: &DocumentId) {
        self.store.clear(id);
    }

    /// Applies the stored set onto a freshly opened buffer.
    ///
    /// Lines at or past the end of the buffer are skipped (the file may
    /// have shrunk since the bookmarks were saved). The stored set is then
    /// stale, so it is dropped and the next query rebuilds it from the
    /// marks that were applied.
    pub fn on_buffer_opened<M>(&mut self, id: &DocumentId, markers: &mut M)
    where
        M: LineMarkers + ?Sized,
    {
        let line_count = markers.line_count();
        let mut skipped = 0;

        for &line in self.store.get(id).lines() {
            if line < line_count {
                markers.set_marked(line, true);
            } else {
                skipped += 1;
            }
        }

        if skipped > 0 {
            tracing::debug!("Skipped {} bookmarks past the end of {}", skipped, id);
            self.invalidate(id);
        }
    }

    /// Takes the buffer's current marks as final and persists them.
    pub fn on_buffer_closing<M>(&mut self, id: &DocumentId, markers: &M)
    where
        M: LineMarkers + ?Sized,
    {
        self.rebuild(id, markers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::cell::Cell;
    use std::collections::BTreeSet;

    /// Marker state that counts how often it is scanned.
    #[derive(Default)]
    struct CountingMarkers {
        lines: BTreeSet<usize>,
        line_count: usize,
        scans: Cell<usize>,
    }

    impl CountingMarkers {
        fn with_lines(line_count: usize, marked: &[usize]) -> Self {
            Self {
                lines: marked.iter().copied().collect(),
                line_count,
                scans: Cell::new(0),
            }
        }
    }

    impl LineMarkers for CountingMarkers {
        fn is_marked(&self, line: usize) -> bool {
            self.lines.contains(&line)
        }

        fn set_marked(&mut self, line: usize, marked: bool) {
            if line >= self.line_count {
                return;
            }
            if marked {
                self.lines.insert(line);
            } else {
                self.lines.remove(&line);
            }
        }

        fn line_count(&self) -> usize {
            self.line_count
        }

        fn for_each_marked_line(&self, visit: &mut dyn FnMut(usize)) {
            self.scans.set(self.scans.get() + 1);
            self.lines.iter().copied().for_each(visit);
        }
    }

    fn doc() -> DocumentId {
        DocumentId::from("f")
    }

    #[test]
    fn test_ensure_fresh_scans_once() {
        let mut store = BookmarkStore::new(MemoryStorage::new());
        let markers = CountingMarkers::with_lines(20, &[3, 8]);
        let mut sync = SyncEngine::new(&mut store);

        assert!(sync.ensure_fresh(&doc(), &markers));
        assert!(sync.ensure_fresh(&doc(), &markers));

        assert_eq!(markers.scans.get(), 1);
        assert_eq!(store.get(&doc()).lines(), &[3, 8]);
    }

    #[test]
    fn test_ensure_fresh_without_marks() {
        let mut store = BookmarkStore::new(MemoryStorage::new());
        let markers = CountingMarkers::with_lines(20, &[]);

        assert!(!SyncEngine::new(&mut store).ensure_fresh(&doc(), &markers));
        assert!(store.contains(&doc()));
    }

    #[test]
    fn test_empty_set_is_cached() {
        let storage = MemoryStorage::new();
        let mut store = BookmarkStore::new(storage.clone());
        let mut rx = store.subscribe();
        let markers = CountingMarkers::with_lines(20, &[]);

        let mut sync = SyncEngine::new(&mut store);
        assert!(!sync.ensure_fresh(&doc(), &markers));
        assert!(!sync.ensure_fresh(&doc(), &markers));
        assert!(!sync.ensure_fresh(&doc(), &markers));

        assert_eq!(markers.scans.get(), 1);
        assert_eq!(storage.save_count(), 1);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_invalidate_then_rebuild_uses_markers_only() {
        let mut store = BookmarkStore::new(MemoryStorage::new());
        store.replace(&doc(), [1, 2, 3]);
        let markers = CountingMarkers::with_lines(20, &[10]);

        let mut sync = SyncEngine::new(&mut store);
        assert!(sync.ensure_fresh(&doc(), &markers));
        assert_eq!(markers.scans.get(), 0);

        sync.invalidate(&doc());
        assert!(sync.ensure_fresh(&doc(), &markers));

        assert_eq!(markers.scans.get(), 1);
        assert_eq!(store.get(&doc()).lines(), &[10]);
    }

    #[test]
    fn test_opened_skips_lines_past_end() {
        let mut store = BookmarkStore::new(MemoryStorage::new());
        store.replace(&doc(), [0, 4, 5, 12]);
        let mut markers = CountingMarkers::with_lines(5, &[]);

        SyncEngine::new(&mut store).on_buffer_opened(&doc(), &mut markers);

        assert_eq!(markers.marked_lines(), vec![0, 4]);
        assert!(!store.contains(&doc()));
    }

    #[test]
    fn test_opened_keeps_set_when_everything_fits() {
        let mut store = BookmarkStore::new(MemoryStorage::new());
        store.replace(&doc(), [0, 4]);
        let mut markers = CountingMarkers::with_lines(5, &[]);

        SyncEngine::new(&mut store).on_buffer_opened(&doc(), &mut markers);

        assert_eq!(store.get(&doc()).lines(), &[0, 4]);
    }

    #[test]
    fn test_closing_rescans_even_when_cached() {
        let storage = MemoryStorage::new();
        let mut store = BookmarkStore::new(storage.clone());
        store.replace(&doc(), [1]);
        let markers = CountingMarkers::with_lines(20, &[6, 2]);

        SyncEngine::new(&mut store).on_buffer_closing(&doc(), &markers);

        assert_eq!(markers.scans.get(), 1);
        assert_eq!(storage.snapshot()[&doc()].lines(), &[2, 6]);
    }
}
