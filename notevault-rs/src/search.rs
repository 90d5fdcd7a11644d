//! Full-text and tag search over vault notes.

use crate::error::{Result, VaultError};
use crate::parser::{Frontmatter, parse_tags, tag_matches};
use crate::vault::Vault;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Matching lines reported per note.
const MAX_LINES_PER_NOTE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineMatch {
    pub line: usize,
    pub text: String,
}

/// A note containing the query.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub path: PathBuf,
    pub matches: Vec<LineMatch>,
}

/// A note carrying the tag.
#[derive(Debug, Clone, Serialize)]
pub struct TagHit {
    pub path: PathBuf,
    /// Matching tags as written, frontmatter first.
    pub tags: Vec<String>,
}

fn read_or_skip(vault: &Vault, note: &Path) -> Option<String> {
    match std::fs::read_to_string(vault.root.join(note)) {
        Ok(content) => Some(content),
        Err(e) => {
            tracing::warn!(path = %note.display(), error = %e, "skipping unreadable note");
            None
        }
    }
}

/// Case-insensitive substring search, line by line. At most
/// `max_results` notes, each with up to three matching lines.
pub fn search_notes(
    vault: &Vault,
    query: &str,
    folder: &str,
    max_results: usize,
) -> Result<Vec<SearchHit>> {
    if query.trim().is_empty() {
        return Err(VaultError::Other("search query cannot be empty".to_string()));
    }
    let needle = query.to_lowercase();
    let folder = Path::new(folder.trim().trim_matches('/'));

    let mut hits = Vec::new();
    for note in vault.list_notes()? {
        if hits.len() >= max_results {
            break;
        }
        if !note.starts_with(folder) {
            continue;
        }
        let Some(content) = read_or_skip(vault, &note) else {
            continue;
        };

        let matches: Vec<LineMatch> = content
            .lines()
            .enumerate()
            .filter(|(_, line)| line.to_lowercase().contains(&needle))
            .take(MAX_LINES_PER_NOTE)
            .map(|(idx, line)| LineMatch {
                line: idx + 1,
                text: line.trim().to_string(),
            })
            .collect();

        if !matches.is_empty() {
            hits.push(SearchHit {
                path: note,
                matches,
            });
        }
    }

    tracing::debug!(query, hits = hits.len(), "search finished");
    Ok(hits)
}

/// Notes tagged with `tag` in frontmatter or inline, ignoring case.
/// Nested tags count: `#project/active` matches `project`.
pub fn search_by_tag(vault: &Vault, tag: &str) -> Result<Vec<TagHit>> {
    let tag = tag.trim().trim_start_matches('#');
    if tag.is_empty() {
        return Err(VaultError::Other("tag cannot be empty".to_string()));
    }

    let mut hits = Vec::new();
    for note in vault.list_notes()? {
        let Some(content) = read_or_skip(vault, &note) else {
            continue;
        };

        let frontmatter = Frontmatter::parse_lenient(&content);
        let mut tags: Vec<String> = frontmatter
            .tags()
            .into_iter()
            .filter(|t| tag_matches(t, tag))
            .map(|t| format!("#{}", t))
            .collect();

        for inline in parse_tags(&frontmatter.body) {
            if tag_matches(&inline.name, tag) && !tags.contains(&inline.name) {
                tags.push(inline.name);
            }
        }

        if !tags.is_empty() {
            hits.push(TagHit { path: note, tags });
        }
    }

    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Vault) {
        let temp = TempDir::new().unwrap();
        let files = [
            ("a.md", "---\ntags: [project]\n---\nRust is great\nrust again\nRUST thrice\nrust four\n"),
            ("Sub/b.md", "Working on #project/active today.\n"),
            ("c.md", "---\ntags: other\n---\n`#project` in code\nNothing about the language\n"),
            (".trash/d.md", "rust #project"),
        ];
        for (path, content) in files {
            let full = temp.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        let vault = Vault::open(temp.path()).unwrap();
        (temp, vault)
    }

    #[test]
    fn test_search_case_insensitive_limited_lines() {
        let (_temp, vault) = setup();
        let hits = search_notes(&vault, "RUST", "", 20).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, PathBuf::from("a.md"));
        let lines: Vec<usize> = hits[0].matches.iter().map(|m| m.line).collect();
        assert_eq!(lines, vec![4, 5, 6]);
    }

    #[test]
    fn test_search_folder_and_limit() {
        let (_temp, vault) = setup();
        assert_eq!(search_notes(&vault, "today", "Sub", 20).unwrap().len(), 1);
        assert!(search_notes(&vault, "today", "Other", 20).unwrap().is_empty());
        assert_eq!(search_notes(&vault, "o", "", 1).unwrap().len(), 1);
        assert!(search_notes(&vault, "  ", "", 20).is_err());
    }

    #[test]
    fn test_search_by_tag() {
        let (_temp, vault) = setup();
        let hits = search_by_tag(&vault, "#Project").unwrap();
        let paths: Vec<PathBuf> = hits.iter().map(|h| h.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("Sub/b.md"), PathBuf::from("a.md")]);
        assert_eq!(hits[0].tags, vec!["#project/active"]);
        assert_eq!(hits[1].tags, vec!["#project"]);
    }
}
