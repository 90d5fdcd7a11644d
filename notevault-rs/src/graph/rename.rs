//! Rewriting links after a note moves.

use super::link_graph::LinkGraph;
use crate::error::{Result, VaultError};
use crate::parser::parse_links;
use crate::vault::ResolvedPath;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// A note whose links were rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatedNote {
    pub path: PathBuf,
    pub links_updated: usize,
}

/// A note that could not be rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedNote {
    pub path: PathBuf,
    pub reason: String,
}

/// Per-note outcome of link propagation. Propagation is not transactional:
/// notes listed in `updated` stay rewritten even when others failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenameReport {
    pub updated: Vec<UpdatedNote>,
    pub failed: Vec<FailedNote>,
}

impl RenameReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total number of links rewritten.
    pub fn links_updated(&self) -> usize {
        self.updated.iter().map(|u| u.links_updated).sum()
    }

    /// Turn failures into a [`VaultError::PartialFailure`].
    pub fn ensure_complete(&self) -> Result<()> {
        if self.is_complete() {
            return Ok(());
        }
        Err(VaultError::PartialFailure {
            updated: self.updated.len(),
            failed: self
                .failed
                .iter()
                .map(|f| (f.path.clone(), f.reason.clone()))
                .collect(),
        })
    }
}

impl LinkGraph<'_> {
    /// Link target names used anywhere in the vault that currently resolve
    /// to `target`. Call before moving the note: afterwards the same names
    /// may resolve elsewhere or not at all.
    pub fn names_resolving_to(&self, target: &ResolvedPath) -> Result<HashSet<String>> {
        let mut seen: HashMap<String, bool> = HashMap::new();

        for note in self.vault().list_notes()? {
            let content = match std::fs::read_to_string(self.vault().root.join(&note)) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(path = %note.display(), error = %e, "skipping unreadable note");
                    continue;
                }
            };
            for link in parse_links(&content) {
                let name = link.target_name();
                if name.is_empty() || seen.contains_key(name) {
                    continue;
                }
                let hits = self.vault().resolve(name).is_ok_and(|r| &r == target);
                seen.insert(name.to_string(), hits);
            }
        }

        Ok(seen
            .into_iter()
            .filter_map(|(name, hits)| hits.then_some(name))
            .collect())
    }

    /// Rewrite links whose target is one of `names` so they point at `new`.
    ///
    /// `names` comes from [`LinkGraph::names_resolving_to`] taken before the
    /// move, so a link is rewritten exactly when it resolved to the moved
    /// note. The replacement is the new name when it is unique in the vault,
    /// else the new path without `.md`. Only the target text changes;
    /// headings, block ids, display text and the embed marker stay as
    /// written.
    pub fn propagate_rename(
        &self,
        names: &HashSet<String>,
        new: &ResolvedPath,
    ) -> Result<RenameReport> {
        let new_name_unique = self.vault().count_named(new.name())? == 1;
        let replacement = if new_name_unique {
            new.name().to_string()
        } else {
            new.link_path()
        };

        tracing::debug!(
            new = %new,
            %replacement,
            names = names.len(),
            "propagating rename"
        );

        let points_at_old = |name: &str| names.contains(name);

        let mut report = RenameReport::default();
        if names.is_empty() {
            return Ok(report);
        }
        for note in self.vault().list_notes()? {
            match rewrite_note(&self.vault().root.join(&note), &points_at_old, &replacement) {
                Ok(0) => {}
                Ok(links_updated) => report.updated.push(UpdatedNote {
                    path: note,
                    links_updated,
                }),
                Err(e) => {
                    tracing::warn!(path = %note.display(), error = %e, "failed to update links");
                    report.failed.push(FailedNote {
                        path: note,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}

/// Rewrite matching link targets in one file. Returns the number changed.
fn rewrite_note(
    path: &Path,
    points_at_old: &dyn Fn(&str) -> bool,
    replacement: &str,
) -> Result<usize> {
    let content = std::fs::read_to_string(path)?;

    let ranges: Vec<_> = parse_links(&content)
        .filter(|link| points_at_old(link.target_name()))
        .filter(|link| link.target != replacement)
        .map(|link| link.target_range)
        .collect();

    if ranges.is_empty() {
        return Ok(0);
    }

    // Back to front so earlier ranges stay valid
    let mut updated = content.clone();
    for range in ranges.iter().rev() {
        updated.replace_range(range.clone(), replacement);
    }

    std::fs::write(path, updated)?;
    Ok(ranges.len())
}
