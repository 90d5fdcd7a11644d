//! notevault - safe programmatic access to Obsidian-style markdown vaults.
//!
//! # Overview
//!
//! notevault reads and edits a folder of markdown notes the way the host
//! application sees them:
//! - Note references resolve by path or bare name, and never escape the vault
//! - YAML frontmatter is parsed, merged and re-rendered in key order
//! - Wikilinks are parsed lazily; backlinks and outgoing links come from a
//!   fresh scan on every query
//! - Moving a note rewrites links to it across the vault
//! - Daily notes follow the host's `daily-notes.json` settings and templates
//! - Deletes go to `.trash/` when it exists
//!
//! # Example
//!
//! ```no_run
//! use notevault::{DailyNotes, DailyTarget, NoteStore, Vault};
//!
//! let vault = Vault::open("/path/to/vault").unwrap();
//! let store = NoteStore::new(vault);
//!
//! // Read a note by name
//! let note = store.read("Meeting Notes").unwrap();
//! println!("{}", note.body);
//!
//! // Who links here?
//! let target = store.vault().resolve("Meeting Notes").unwrap();
//! for backlink in store.graph().backlinks(&target).unwrap() {
//!     println!("{}:{} {}", backlink.from.display(), backlink.line, backlink.context);
//! }
//!
//! // Append to today's daily note under a heading
//! DailyNotes::new(&store)
//!     .append(DailyTarget::Offset(0), "- shipped it", Some("Log"), true)
//!     .unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod daily;
pub mod diff;
pub mod error;
pub mod graph;
pub mod parser;
pub mod search;
pub mod store;
pub mod template;
pub mod types;
pub mod vault;

// Re-export main types at crate root
pub use config::{AppConfig, TrashPolicy};
pub use daily::{DailyNote, DailyNotes, DailyTarget, format_date};
pub use error::{Result, VaultError};
pub use graph::{Backlink, LinkGraph, LinkStatus, OutgoingLink, RenameReport};
pub use parser::Frontmatter;
pub use store::{DeleteOutcome, EditOutcome, MoveReport, NoteContent, NoteStore, TextEdit, VaultInfo};
pub use types::*;
pub use vault::{ResolvedPath, Vault};
