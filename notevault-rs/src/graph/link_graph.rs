//! Outgoing links and backlinks, computed by scanning the vault.

use crate::error::{Result, VaultError};
use crate::parser::{Frontmatter, parse_links, split_frontmatter};
use crate::types::LinkReference;
use crate::vault::{ResolvedPath, Vault, fold_name as fold};
use serde::Serialize;
use std::path::PathBuf;

/// Where a link points after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LinkStatus {
    Resolved { path: PathBuf },
    Ambiguous { candidates: Vec<PathBuf> },
    Broken,
}

/// A link leaving a note.
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingLink {
    #[serde(flatten)]
    pub link: LinkReference,
    #[serde(flatten)]
    pub status: LinkStatus,
}

impl OutgoingLink {
    pub fn is_broken(&self) -> bool {
        matches!(self.status, LinkStatus::Broken)
    }
}

/// A link from another note into the queried one.
#[derive(Debug, Clone, Serialize)]
pub struct Backlink {
    /// The note containing the link.
    pub from: PathBuf,
    pub line: usize,
    /// The trimmed text of the line holding the link.
    pub context: String,
    pub link: LinkReference,
}

/// Query view over a vault's links. Holds no index: every query re-reads
/// the notes it needs.
#[derive(Debug, Clone, Copy)]
pub struct LinkGraph<'a> {
    vault: &'a Vault,
}

impl<'a> LinkGraph<'a> {
    pub fn new(vault: &'a Vault) -> Self {
        Self { vault }
    }

    pub fn vault(&self) -> &'a Vault {
        self.vault
    }

    /// Links in the body of `note`, each tagged with its resolution.
    pub fn outgoing_links(&self, note: &ResolvedPath) -> Result<Vec<OutgoingLink>> {
        let content = std::fs::read_to_string(note.absolute())?;
        let split = split_frontmatter(&content);
        let line_offset = split.content_start_line - 1;

        let links = parse_links(split.content)
            .map(|mut link| {
                link.line += line_offset;
                let status = self.link_status(&link);
                OutgoingLink { link, status }
            })
            .collect();

        Ok(links)
    }

    fn link_status(&self, link: &LinkReference) -> LinkStatus {
        match self.vault.resolve(link.target_name()) {
            Ok(resolved) => LinkStatus::Resolved {
                path: resolved.relative().to_path_buf(),
            },
            Err(VaultError::AmbiguousResolution { matches, .. }) => {
                LinkStatus::Ambiguous { candidates: matches }
            }
            Err(VaultError::NoteNotFound(_)) => LinkStatus::Broken,
            Err(e) => {
                tracing::debug!(link = %link.target, error = %e, "link treated as broken");
                LinkStatus::Broken
            }
        }
    }

    /// Every link in other notes that points at `target`, by name, path,
    /// path suffix or one of the target's aliases. Case-insensitive.
    pub fn backlinks(&self, target: &ResolvedPath) -> Result<Vec<Backlink>> {
        let matcher = TargetMatcher::new(target);
        let mut backlinks = Vec::new();

        for source in self.vault.list_notes()? {
            if source == target.relative() {
                continue;
            }

            let content = match std::fs::read_to_string(self.vault.root.join(&source)) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(path = %source.display(), error = %e, "skipping unreadable note");
                    continue;
                }
            };

            let lines: Vec<&str> = content.lines().collect();
            for link in parse_links(&content) {
                if !matcher.matches(link.target_name()) {
                    continue;
                }
                let context = lines
                    .get(link.line - 1)
                    .map(|l| l.trim().to_string())
                    .unwrap_or_default();
                backlinks.push(Backlink {
                    from: source.clone(),
                    line: link.line,
                    context,
                    link,
                });
            }
        }

        Ok(backlinks)
    }
}

/// Case-folded names a link may use to point at one note.
struct TargetMatcher {
    stem: String,
    path: String,
    aliases: Vec<String>,
}

impl TargetMatcher {
    fn new(target: &ResolvedPath) -> Self {
        let aliases = std::fs::read_to_string(target.absolute())
            .map(|content| Frontmatter::parse_lenient(&content).aliases())
            .unwrap_or_default();

        Self {
            stem: fold(target.name()),
            path: fold(&target.link_path()),
            aliases: aliases.iter().map(|a| fold(a)).collect(),
        }
    }

    fn matches(&self, name: &str) -> bool {
        let name = fold(name);
        name == self.stem
            || name == self.path
            || self.path.ends_with(&format!("/{}", name))
            || self.aliases.contains(&name)
    }
}
