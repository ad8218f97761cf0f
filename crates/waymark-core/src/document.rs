//! Document management.
//!
//! ## Learning: Newtypes as Keys
//!
//! `DocumentId` wraps a `String` (usually the canonical file path).
//! Wrapping it means a bookmark map can't be indexed by an arbitrary
//! string by accident, and the type name documents what the key is.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use waymark_buffer::{Position, TextBuffer};

use crate::flash::Flash;
use crate::{CoreError, CoreResult};

/// Stable identity of an open document.
///
/// File-backed documents use their canonical absolute path, so the same
/// file always maps to the same bookmarks across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates an identity from any string key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Identity for a file on disk: its canonical absolute path.
    pub fn for_path(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let canonical = path
            .canonicalize()
            .map_err(|_| CoreError::FileNotFound(path.display().to_string()))?;
        Ok(Self(canonical.display().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// A single text buffer being edited, with its cursor.
///
/// `Document` composes a `TextBuffer` and adds the editor-side state
/// bookmarks need: an identity, a cursor line and the transient
/// navigation highlight.
pub struct Document {
    /// Stable identity (never changes while open)
    id: DocumentId,

    /// The underlying text buffer, including its line marks
    buffer: TextBuffer,

    /// Primary cursor
    cursor: Position,

    /// Display name
    name: String,

    /// Transient highlight on the last navigation target
    flash: Flash,
}

impl Document {
    /// Creates an in-memory document with the given identity.
    pub fn from_text(id: DocumentId, text: &str) -> Self {
        Self {
            name: id.to_string(),
            id,
            buffer: TextBuffer::from(text),
            cursor: Position::ZERO,
            flash: Flash::new(),
        }
    }

    /// Opens a document from a file.
    pub fn from_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let id = DocumentId::for_path(path)?;
        let buffer = TextBuffer::from_file(path)?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Unknown")
            .to_string();

        Ok(Self {
            id,
            buffer,
            cursor: Position::ZERO,
            name,
            flash: Flash::new(),
        })
    }

    // ==================== Getters ====================

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Returns the line the cursor is on.
    pub fn cursor_line(&self) -> usize {
        self.cursor.line
    }

    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    pub fn flash(&self) -> &Flash {
        &self.flash
    }

    // ==================== Editing ====================

    /// Moves the cursor, clamping it into the buffer.
    pub fn move_cursor_to(&mut self, pos: Position) {
        let line = pos.line.min(self.line_count().saturating_sub(1));
        let line_len = self.buffer.line_len(line).unwrap_or(0);
        self.cursor = Position::new(line, pos.column.min(line_len));
    }

    /// Inserts text at the cursor and moves the cursor past it.
    pub fn insert_at_cursor(&mut self, text: &str) -> CoreResult<()> {
        let idx = self.buffer.position_to_char_idx(self.cursor)?;
        self.buffer.insert(idx, text)?;
        self.cursor = self
            .buffer
            .char_idx_to_position(idx + text.chars().count())?;
        Ok(())
    }

    /// Deletes whole lines `start..end` (clamped to the buffer).
    pub fn delete_lines(&mut self, start: usize, end: usize) -> CoreResult<()> {
        let lines = self.line_count();
        let end = end.min(lines);
        if start >= end {
            return Ok(());
        }

        let mut from = self.buffer.position_to_char_idx(Position::line_start(start))?;
        let to = if end < lines {
            self.buffer.position_to_char_idx(Position::line_start(end))?
        } else {
            // Deleting through the last line: take the preceding break instead
            from = from.saturating_sub(1);
            self.buffer.len_chars()
        };
        self.buffer.delete(from..to)?;
        self.move_cursor_to(self.cursor);
        Ok(())
    }
}

/// Manages open documents, one per identity.
pub struct DocumentManager {
    /// All open documents
    documents: HashMap<DocumentId, Document>,

    /// Open order, most recent last
    order: Vec<DocumentId>,

    /// Currently active document
    active: Option<DocumentId>,
}

impl DocumentManager {
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
            order: Vec::new(),
            active: None,
        }
    }

    /// Opens a file, or focuses it if it is already open.
    pub fn open(&mut self, path: impl AsRef<Path>) -> CoreResult<DocumentId> {
        let id = DocumentId::for_path(path.as_ref())?;
        if self.documents.contains_key(&id) {
            self.active = Some(id.clone());
            return Ok(id);
        }
        Ok(self.add(Document::from_file(path)?))
    }

    /// Adds a document and makes it active.
    ///
    /// A document whose identity is already open replaces nothing; the
    /// existing one is focused instead.
    pub fn add(&mut self, doc: Document) -> DocumentId {
        let id = doc.id().clone();
        if !self.documents.contains_key(&id) {
            self.documents.insert(id.clone(), doc);
            self.order.push(id.clone());
        }
        self.active = Some(id.clone());
        id
    }

    /// Removes a document and hands it back.
    pub fn close(&mut self, id: &DocumentId) -> CoreResult<Document> {
        let doc = self
            .documents
            .remove(id)
            .ok_or_else(|| CoreError::DocumentNotFound(id.clone()))?;
        self.order.retain(|i| i != id);

        if self.active.as_ref() == Some(id) {
            self.active = self.order.last().cloned();
        }

        Ok(doc)
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn get_mut(&mut self, id: &DocumentId) -> Option<&mut Document> {
        self.documents.get_mut(id)
    }

    pub fn active(&self) -> Option<&Document> {
        self.active.as_ref().and_then(|id| self.documents.get(id))
    }

    pub fn active_mut(&mut self) -> Option<&mut Document> {
        self.active.as_ref().and_then(|id| self.documents.get_mut(id))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl Default for DocumentManager {
    fn default() -> Self {
        Self::new()
    }
}
