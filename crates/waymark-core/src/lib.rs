//! # Waymark Core
//!
//! Per-document line bookmarks: storage, buffer synchronization and
//! circular navigation.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Bookmarks                          │
//! │  ┌───────────────┐ ┌─────────────┐ ┌──────────────────┐  │
//! │  │ BookmarkStore │ │   Config    │ │ BookmarkCommand  │  │
//! │  └───────┬───────┘ └─────────────┘ └──────────────────┘  │
//! │          │                                                │
//! │  ┌───────┴────────┐  ┌──────────────┐  ┌──────────────┐  │
//! │  │   SyncEngine   │──│ LineMarkers  │  │  navigation  │  │
//! │  └───────┬────────┘  └──────────────┘  └──────────────┘  │
//! │          │                                                │
//! │  ┌───────┴────────┐  ┌──────────────┐                     │
//! │  │ BookmarkStorage│  │   EventBus   │                     │
//! │  └────────────────┘  └──────────────┘                     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The store is the single source of truth once loaded. The buffer's
//! line marks are the ground truth for *where* bookmarks currently are;
//! any edit discards the cached set and the next query rebuilds it.

pub mod bookmarks;
pub mod command;
pub mod config;
pub mod document;
pub mod event;
pub mod flash;
pub mod markers;
pub mod navigation;
pub mod storage;
pub mod store;
pub mod sync;

pub use bookmarks::Bookmarks;
pub use command::{BookmarkCommand, CommandOutcome};
pub use config::Config;
pub use document::{Document, DocumentId, DocumentManager};
pub use event::{BookmarkEvent, DocumentEvent, EventBus};
pub use flash::Flash;
pub use markers::LineMarkers;
pub use navigation::{Direction, find_target};
pub use storage::{BookmarkStorage, JsonFileStorage, MemoryStorage, StorageError};
pub use store::{BookmarkMap, BookmarkSet, BookmarkStore};
pub use sync::SyncEngine;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Buffer error: {0}")]
    Buffer(#[from] waymark_buffer::BufferError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}
