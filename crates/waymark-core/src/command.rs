//! Bookmark commands.
//!
//! Commands are plain values so a host can bind them to keys or menu
//! items however it likes; [`crate::Bookmarks::execute`] runs them
//! against the active document.

use crate::navigation::Direction;

/// The user-facing bookmark actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookmarkCommand {
    /// Toggle a bookmark on the cursor line
    ToggleBookmark,
    /// Jump to the next bookmark, wrapping at the end
    GotoNextBookmark,
    /// Jump to the previous bookmark, wrapping at the start
    GotoPrevBookmark,
}

impl BookmarkCommand {
    pub const ALL: [BookmarkCommand; 3] = [
        BookmarkCommand::ToggleBookmark,
        BookmarkCommand::GotoNextBookmark,
        BookmarkCommand::GotoPrevBookmark,
    ];

    /// Stable command identifier.
    pub fn id(&self) -> &'static str {
        match self {
            BookmarkCommand::ToggleBookmark => "waymark.toggleBookmark",
            BookmarkCommand::GotoNextBookmark => "waymark.gotoNextBookmark",
            BookmarkCommand::GotoPrevBookmark => "waymark.gotoPrevBookmark",
        }
    }

    /// Returns the command's display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            BookmarkCommand::ToggleBookmark => "Toggle Bookmark",
            BookmarkCommand::GotoNextBookmark => "Next Bookmark",
            BookmarkCommand::GotoPrevBookmark => "Previous Bookmark",
        }
    }

    /// Suggested key binding.
    pub fn default_binding(&self) -> &'static str {
        match self {
            BookmarkCommand::ToggleBookmark => "Ctrl-Shift-K",
            BookmarkCommand::GotoNextBookmark => "Ctrl-P",
            BookmarkCommand::GotoPrevBookmark => "Ctrl-Shift-P",
        }
    }

    /// Looks a command up by its identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.id() == id)
    }

    /// Navigation direction, for the goto commands.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            BookmarkCommand::ToggleBookmark => None,
            BookmarkCommand::GotoNextBookmark => Some(Direction::Forward),
            BookmarkCommand::GotoPrevBookmark => Some(Direction::Backward),
        }
    }
}

/// What running a command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A line's bookmark was flipped
    Toggled { line: usize, marked: bool },
    /// The cursor jumped to a bookmark
    Jumped(usize),
    /// Nothing to do (no document, no bookmarks, or already there)
    Nothing,
}
