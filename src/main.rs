//! # Waymark - line bookmarks for text files
//!
//! Each invocation opens a file, applies its saved bookmarks, runs one
//! action and closes the file again, which persists the bookmarks.
//!
//! ```bash
//! # Toggle bookmarks on lines 3 and 10
//! waymark toggle src/main.rs 3 10
//!
//! # Where is the next bookmark after line 4?
//! waymark next src/main.rs --line 4
//!
//! # Show every bookmarked file
//! waymark list
//! ```
//!
//! Line numbers on the command line are 1-based.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use waymark_buffer::Position;
use waymark_core::{
    BookmarkCommand, Bookmarks, CommandOutcome, Config, DocumentEvent, DocumentId,
    DocumentManager,
};

/// Waymark - line bookmarks that survive across sessions
#[derive(Parser, Debug)]
#[command(name = "waymark")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (defaults to the user config dir)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Bookmark file (overrides the config)
    #[arg(short, long, value_name = "FILE")]
    store: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// List bookmarks of one file, or of every file
    List {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Toggle bookmarks on the given lines
    Toggle {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(value_name = "LINE", required = true, value_parser = clap::value_parser!(u64).range(1..))]
        lines: Vec<u64>,
    },
    /// Print the next bookmark after a line, wrapping around
    Next {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Cursor line
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        line: u64,
    },
    /// Print the previous bookmark before a line, wrapping around
    Prev {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Cursor line
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        line: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting Waymark v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load(),
    };
    if let Some(store) = args.store {
        config.bookmarks.storage_path = Some(store);
    }

    let mut bookmarks = Bookmarks::open(&config).context("Failed to open bookmark store")?;

    match args.action {
        Action::List { file: None } => {
            for (id, set) in bookmarks.store().iter().filter(|(_, set)| !set.is_empty()) {
                println!("{}: {}", id, one_based(set.lines()));
            }
        }
        Action::List { file: Some(file) } => {
            with_document(&mut bookmarks, &file, |bookmarks, docs| {
                if let Some(doc) = docs.active() {
                    println!("{}", one_based(bookmarks.bookmarks_for(doc).lines()));
                }
            })?;
        }
        Action::Toggle { file, lines } => {
            with_document(&mut bookmarks, &file, |bookmarks, docs| {
                let Some(doc) = docs.active_mut() else { return };
                for line in lines {
                    match bookmarks.toggle_line(doc, to_index(line)) {
                        Some(marked) => println!("{} {}", if marked { "+" } else { "-" }, line),
                        None => tracing::warn!("Line {} is past the end of {}", line, doc.name()),
                    }
                }
            })?;
        }
        Action::Next { file, line } => {
            jump(&mut bookmarks, &file, line, BookmarkCommand::GotoNextBookmark)?;
        }
        Action::Prev { file, line } => {
            jump(&mut bookmarks, &file, line, BookmarkCommand::GotoPrevBookmark)?;
        }
    }

    Ok(())
}

/// Opens `file`, runs `action`, then closes it so its bookmarks are saved.
fn with_document<F>(bookmarks: &mut Bookmarks, file: &Path, action: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut Bookmarks, &mut DocumentManager),
{
    let mut docs = DocumentManager::new();
    let id: DocumentId = docs
        .open(file)
        .with_context(|| format!("Failed to open {}", file.display()))?;

    bookmarks.handle(&DocumentEvent::Opened(id.clone()), docs.get_mut(&id));
    action(bookmarks, &mut docs);
    bookmarks.handle(&DocumentEvent::Closing(id.clone()), docs.get_mut(&id));
    docs.close(&id)?;

    Ok(())
}

fn jump(
    bookmarks: &mut Bookmarks,
    file: &Path,
    line: u64,
    cmd: BookmarkCommand,
) -> anyhow::Result<()> {
    with_document(bookmarks, file, |bookmarks, docs| {
        let Some(doc) = docs.active_mut() else { return };
        doc.move_cursor_to(Position::line_start(to_index(line)));
        if let CommandOutcome::Jumped(target) = bookmarks.execute(cmd, Some(doc)) {
            println!("{}", target + 1);
        }
    })
}

/// 1-based user line to 0-based index.
fn to_index(line: u64) -> usize {
    usize::try_from(line.saturating_sub(1)).unwrap_or(usize::MAX)
}

fn one_based(lines: &[usize]) -> String {
    lines
        .iter()
        .map(|line| (line + 1).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
