//! Bookmark orchestration.
//!
//! ## Learning: The Facade Pattern
//!
//! `Bookmarks` is the one object a host editor talks to. It owns the
//! store and hands it by reference to a short-lived [`SyncEngine`] for
//! each operation; nothing else can reach the store, so there is no
//! shared mutable state to guard.
//!
//! Every operation takes the document it acts on. A missing document
//! (closed between dispatch and execution) is a silent no-op.

use waymark_buffer::Position;

use crate::command::{BookmarkCommand, CommandOutcome};
use crate::config::{BookmarkConfig, Config};
use crate::document::Document;
use crate::event::{BookmarkEvent, DocumentEvent};
use crate::navigation::{Direction, find_target};
use crate::storage::JsonFileStorage;
use crate::store::{BookmarkSet, BookmarkStore};
use crate::sync::SyncEngine;
use crate::CoreResult;

/// Bookmarks for every document, plus the operations on them.
pub struct Bookmarks {
    /// All bookmark sets
    store: BookmarkStore,

    /// Behavior settings
    config: BookmarkConfig,
}

impl Bookmarks {
    /// Creates bookmarks over an already loaded store.
    pub fn new(store: BookmarkStore) -> Self {
        Self::with_config(store, BookmarkConfig::default())
    }

    pub fn with_config(store: BookmarkStore, config: BookmarkConfig) -> Self {
        Self { store, config }
    }

    /// Opens the JSON bookmark file named by `config` and loads it.
    pub fn open(config: &Config) -> CoreResult<Self> {
        let path = config.bookmarks.storage_path()?;
        tracing::debug!("Using bookmark file {}", path.display());
        let store = BookmarkStore::open(JsonFileStorage::new(path));
        Ok(Self::with_config(store, config.bookmarks.clone()))
    }

    pub fn store(&self) -> &BookmarkStore {
        &self.store
    }

    pub fn config(&self) -> &BookmarkConfig {
        &self.config
    }

    /// Subscribes to bookmark change notifications.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<BookmarkEvent> {
        self.store.subscribe()
    }

    fn sync(&mut self) -> SyncEngine<'_> {
        SyncEngine::new(&mut self.store)
    }

    // ==================== Lifecycle ====================

    /// Reacts to a buffer lifecycle event.
    pub fn handle(&mut self, event: &DocumentEvent, doc: Option<&mut Document>) {
        let Some(doc) = doc else {
            tracing::debug!("Ignoring {:?}: document is not open", event);
            return;
        };
        let id = event.document();
        if doc.id() != id {
            tracing::warn!("Ignoring {:?}: delivered to {}", event, doc.id());
            return;
        }

        match event {
            DocumentEvent::Opened(_) => {
                if self.config.restore_on_open {
                    self.sync().on_buffer_opened(id, doc.buffer_mut());
                }
            }
            DocumentEvent::Changed(_) => self.sync().invalidate(id),
            DocumentEvent::Closing(_) => self.sync().on_buffer_closing(id, doc.buffer()),
        }
    }

    // ==================== Queries ====================

    /// Returns the document's bookmarks, rebuilding them if needed.
    pub fn bookmarks_for(&mut self, doc: &Document) -> &BookmarkSet {
        self.sync().ensure_fresh(doc.id(), doc.buffer());
        self.store.get(doc.id())
    }

    // ==================== Toggle ====================

    /// Toggles the bookmark on the cursor line. Returns the new state.
    pub fn toggle(&mut self, doc: &mut Document) -> Option<bool> {
        let line = doc.cursor_line();
        self.toggle_line(doc, line)
    }

    /// Toggles the bookmark on `line`. Lines past the end are ignored.
    ///
    /// Only the buffer's marks change here; the cached set is dropped and
    /// rebuilt from the marks on the next query.
    pub fn toggle_line(&mut self, doc: &mut Document, line: usize) -> Option<bool> {
        let marked = doc.buffer_mut().toggle_mark(line).ok()?;
        tracing::debug!("Toggled line {} of {} (marked: {})", line, doc.id(), marked);
        self.sync().invalidate(doc.id());
        Some(marked)
    }

    // ==================== Navigation ====================

    /// Moves the cursor to the next or previous bookmark.
    ///
    /// Returns the target line, or `None` if there are no bookmarks or
    /// the cursor already sits on the only candidate.
    pub fn goto(&mut self, doc: &mut Document, direction: Direction) -> Option<usize> {
        if !self.sync().ensure_fresh(doc.id(), doc.buffer()) {
            return None;
        }

        let bookmarks = self.store.get(doc.id()).lines();
        let target = find_target(bookmarks, doc.cursor_line(), direction)?;

        doc.move_cursor_to(Position::line_start(target));
        doc.flash().trigger(target, self.config.flash_duration());
        Some(target)
    }

    pub fn goto_next(&mut self, doc: &mut Document) -> Option<usize> {
        self.goto(doc, Direction::Forward)
    }

    pub fn goto_prev(&mut self, doc: &mut Document) -> Option<usize> {
        self.goto(doc, Direction::Backward)
    }

    // ==================== Commands ====================

    /// Runs a command against the active document, if any.
    pub fn execute(&mut self, cmd: BookmarkCommand, doc: Option<&mut Document>) -> CommandOutcome {
        let Some(doc) = doc else {
            return CommandOutcome::Nothing;
        };

        match cmd.direction() {
            Some(direction) => self
                .goto(doc, direction)
                .map_or(CommandOutcome::Nothing, CommandOutcome::Jumped),
            None => {
                let line = doc.cursor_line();
                self.toggle(doc)
                    .map_or(CommandOutcome::Nothing, |marked| CommandOutcome::Toggled { line, marked })
            }
        }
    }
}
