//! Transient highlight on a navigation target.
//!
//! After a jump the target line is lit for a short moment. The reset is
//! fire-and-forget: a tokio task sleeps and then unlights the line. The
//! buffer may have changed in the meantime, so unlighting a line that is
//! gone (or already unlit) does nothing.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Lines currently flashing in one document.
///
/// Clones share state, so the reset task can hold its own handle.
#[derive(Debug, Clone, Default)]
pub struct Flash {
    lines: Arc<Mutex<BTreeSet<usize>>>,
}

impl Flash {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `line` is currently lit.
    pub fn is_lit(&self, line: usize) -> bool {
        self.lines
            .lock()
            .map(|lines| lines.contains(&line))
            .unwrap_or(false)
    }

    /// Returns every lit line.
    pub fn lit_lines(&self) -> Vec<usize> {
        self.lines
            .lock()
            .map(|lines| lines.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Lights `line` and schedules it to go dark after `duration`.
    ///
    /// Needs a tokio runtime for the reset. Without one nothing is lit
    /// and `None` is returned.
    pub fn trigger(&self, line: usize, duration: Duration) -> Option<JoinHandle<()>> {
        let Ok(runtime) = Handle::try_current() else {
            tracing::debug!("No runtime for highlight reset, skipping flash on line {}", line);
            return None;
        };

        self.light(line);
        let flash = self.clone();
        Some(runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            flash.unlight(line);
        }))
    }

    fn light(&self, line: usize) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.insert(line);
        }
    }

    /// Unlights `line`. Unknown lines are ignored.
    pub fn unlight(&self, line: usize) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.remove(&line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_flash_clears_after_delay() {
        let flash = Flash::new();
        let reset = flash.trigger(3, Duration::from_millis(10)).unwrap();

        assert!(flash.is_lit(3));
        reset.await.unwrap();
        assert!(!flash.is_lit(3));
    }

    #[tokio::test]
    async fn test_reset_of_cleared_line_is_noop() {
        let flash = Flash::new();
        let reset = flash.trigger(8, Duration::from_millis(10)).unwrap();

        flash.unlight(8);
        reset.await.unwrap();

        assert!(flash.lit_lines().is_empty());
    }

    #[test]
    fn test_without_runtime_nothing_is_lit() {
        let flash = Flash::new();
        assert!(flash.trigger(1, Duration::from_millis(10)).is_none());
        assert!(!flash.is_lit(1));
    }
}
