//! Shared types for notevault.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::PathBuf;

/// A wikilink or embed found in a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkReference {
    /// The target name or path, as written (trimmed).
    pub target: String,

    /// Optional display alias (the part after |).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Optional heading reference (the part after #, before ^).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,

    /// Optional block reference (the part after #^).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,

    /// Whether this is an embed (![[...]]) rather than a link.
    pub embed: bool,

    /// Line number where this link appears (1-indexed).
    pub line: usize,

    /// Start column in the line (0-indexed, bytes).
    pub start_col: usize,

    /// End column in the line (0-indexed, exclusive).
    pub end_col: usize,

    /// Byte range of the target text within the scanned content.
    #[serde(skip)]
    pub target_range: Range<usize>,
}

impl LinkReference {
    /// The target name used for comparisons: no `.md` suffix, no leading `/`.
    pub fn target_name(&self) -> &str {
        let target = self.target.trim_start_matches('/');
        target.strip_suffix(".md").unwrap_or(target)
    }
}

/// A markdown heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading text without the leading #s.
    pub text: String,
    /// Nesting depth (1-6).
    pub level: u8,
    /// Line number (1-indexed).
    pub line: usize,
}

/// A tag found in note content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name including the leading `#`.
    pub name: String,
    /// Line number (1-indexed).
    pub line: usize,
}

/// Kind of entry in a folder listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Dir,
    Note,
    File,
}

/// An entry from a folder listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteEntry {
    /// Path relative to the vault root.
    pub path: PathBuf,
    pub kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(target: &str) -> LinkReference {
        LinkReference {
            target: target.to_string(),
            alias: None,
            heading: None,
            block_id: None,
            embed: false,
            line: 1,
            start_col: 0,
            end_col: 0,
            target_range: 0..0,
        }
    }

    #[test]
    fn test_target_name_strips_extension() {
        assert_eq!(link("folder/Note.md").target_name(), "folder/Note");
        assert_eq!(link("/Note").target_name(), "Note");
        assert_eq!(link("Note").target_name(), "Note");
    }
}
