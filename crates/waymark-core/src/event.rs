//! Bookmark change signal and document lifecycle events.
//!
//! ## Learning: Observer Pattern in Rust
//!
//! Rather than keeping a list of listener callbacks, the store owns a
//! `tokio::sync::broadcast` sender. A listener (a bookmark panel, say)
//! holds a receiver; dropping the receiver is the unsubscribe.
//!
//! The signal carries no payload. Listeners re-read the store.

use tokio::sync::broadcast;

use crate::document::DocumentId;

/// Notifications produced by the bookmark store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkEvent {
    /// Some document's bookmarks changed
    Changed,
}

/// Buffer lifecycle events consumed from the host editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    /// A buffer was opened and is ready for markers
    Opened(DocumentId),
    /// A buffer's text changed; cached line numbers may be stale
    Changed(DocumentId),
    /// A buffer is about to close
    Closing(DocumentId),
}

impl DocumentEvent {
    /// Returns the document this event is about.
    pub fn document(&self) -> &DocumentId {
        match self {
            DocumentEvent::Opened(id) | DocumentEvent::Changed(id) | DocumentEvent::Closing(id) => {
                id
            }
        }
    }
}

/// Event bus for broadcasting bookmark changes.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<BookmarkEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        // Consecutive changes collapse into "re-read", so a small buffer is enough
        let (sender, _) = broadcast::channel(64);
        Self { sender }
    }

    /// Emits an event to all subscribers.
    pub fn emit(&self, event: BookmarkEvent) {
        // No receivers is fine
        let _ = self.sender.send(event);
    }

    /// Subscribes to events.
    ///
    /// Returns a receiver that will get all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<BookmarkEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper for listening to bookmark changes asynchronously.
///
/// ## Example
///
/// ```ignore
/// let mut handler = EventHandler::new(store.subscribe());
///
/// tokio::spawn(async move {
///     while handler.next().await.is_some() {
///         // Re-read the store and redraw the panel
///     }
/// });
/// ```
pub struct EventHandler {
    receiver: broadcast::Receiver<BookmarkEvent>,
}

impl EventHandler {
    pub fn new(receiver: broadcast::Receiver<BookmarkEvent>) -> Self {
        Self { receiver }
    }

    /// Waits for the next event.
    ///
    /// A lagged receiver still yields `Changed`: missing some signals
    /// only means the listener has more to re-read.
    pub async fn next(&mut self) -> Option<BookmarkEvent> {
        match self.receiver.recv().await {
            Ok(event) => Some(event),
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::debug!("Bookmark listener lagged, missed {} events", n);
                Some(BookmarkEvent::Changed)
            }
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.emit(BookmarkEvent::Changed);

        let event = rx.recv().await.unwrap();
        assert_eq!(event, BookmarkEvent::Changed);
    }

    #[tokio::test]
    async fn test_lagged_handler_still_reports_change() {
        let bus = EventBus::new();
        let mut handler = EventHandler::new(bus.subscribe());

        for _ in 0..100 {
            bus.emit(BookmarkEvent::Changed);
        }

        assert_eq!(handler.next().await, Some(BookmarkEvent::Changed));
    }

    #[tokio::test]
    async fn test_handler_ends_when_bus_dropped() {
        let bus = EventBus::new();
        let mut handler = EventHandler::new(bus.subscribe());
        drop(bus);

        assert_eq!(handler.next().await, None);
    }

    #[test]
    fn test_document_event_target() {
        let id = DocumentId::from("f");
        assert_eq!(DocumentEvent::Closing(id.clone()).document(), &id);
    }
}
