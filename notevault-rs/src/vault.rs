//! Vault representation, listing and note reference resolution.

use crate::config::{DailyNotesConfig, HOST_CONFIG_DIR, HostConfig, TemplatesConfig};
use crate::error::{Result, VaultError};
use crate::types::{EntryKind, NoteEntry};
use glob::glob;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Soft-delete directory at the vault root.
pub const TRASH_DIR: &str = ".trash";

/// Non-hidden directory names skipped by listing and search.
const SKIPPED_DIRS: &[&str] = &["node_modules"];

/// A note location proven to be inside the vault.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedPath {
    absolute: PathBuf,
    relative: PathBuf,
}

impl ResolvedPath {
    /// Absolute, symlink-free path.
    pub fn absolute(&self) -> &Path {
        &self.absolute
    }

    /// Path relative to the vault root.
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// File name without the `.md` extension.
    pub fn name(&self) -> &str {
        self.relative
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
    }

    /// Vault-relative path with `/` separators and no `.md`, as used in links.
    pub fn link_path(&self) -> String {
        let path = slash_path(&self.relative);
        path.strip_suffix(".md").map(str::to_string).unwrap_or(path)
    }
}

impl std::fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", slash_path(&self.relative))
    }
}

/// Represents an Obsidian vault.
#[derive(Debug, Clone)]
pub struct Vault {
    /// Canonical root path of the vault.
    pub root: PathBuf,
    host: HostConfig,
}

impl Vault {
    /// Open a vault rooted at an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.is_dir() {
            return Err(VaultError::VaultNotFound(root));
        }

        let root = root.canonicalize()?;
        let host = HostConfig::new(&root);
        Ok(Self { root, host })
    }

    /// Daily notes settings, read fresh from disk.
    pub fn daily_notes_config(&self) -> DailyNotesConfig {
        self.host.daily_notes()
    }

    /// Templates settings, read fresh from disk.
    pub fn templates_config(&self) -> TemplatesConfig {
        self.host.templates()
    }

    /// Raw property type declarations from the host config.
    pub fn property_types(&self) -> serde_json::Map<String, serde_json::Value> {
        self.host.property_types()
    }

    /// Absolute path of the trash directory (may not exist).
    pub fn trash_dir(&self) -> PathBuf {
        self.root.join(TRASH_DIR)
    }

    /// Normalize a note path (add .md extension if needed).
    pub fn normalize_note_path(&self, path: &str) -> PathBuf {
        let path = path.trim().trim_matches('/');
        if path.ends_with(".md") {
            PathBuf::from(path)
        } else {
            PathBuf::from(format!("{}.md", path))
        }
    }

    /// Markdown files under the root, skipping hidden and reserved
    /// directories. No containment check.
    fn walk_notes(&self) -> Result<Vec<PathBuf>> {
        let pattern_str = format!(
            "{}/**/*.md",
            glob::Pattern::escape(&self.root.to_string_lossy())
        );

        let mut notes = Vec::new();
        for entry in glob(&pattern_str)? {
            match entry {
                Ok(path) => {
                    if let Ok(relative) = path.strip_prefix(&self.root) {
                        if !is_skipped(relative) {
                            notes.push(relative.to_path_buf());
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable path while listing");
                }
            }
        }

        notes.sort();
        Ok(notes)
    }

    /// List all notes in the vault (relative paths, sorted). Notes whose
    /// real location is outside the vault are left out.
    pub fn list_notes(&self) -> Result<Vec<PathBuf>> {
        let notes = self.walk_notes()?;
        Ok(notes
            .into_iter()
            .filter(|relative| match self.contain(relative) {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!(path = %relative.display(), error = %e, "skipping note");
                    false
                }
            })
            .collect())
    }

    /// Number of notes whose name equals `name`, ignoring case.
    pub fn count_named(&self, name: &str) -> Result<usize> {
        let wanted = fold_name(name);
        Ok(self
            .list_notes()?
            .iter()
            .filter(|note| {
                note.file_stem()
                    .is_some_and(|stem| fold_name(&stem.to_string_lossy()) == wanted)
            })
            .count())
    }

    /// Canonicalize a vault-relative path and verify it stays in the vault.
    fn contain(&self, relative: &Path) -> Result<ResolvedPath> {
        let real = self.root.join(relative).canonicalize()?;
        match real.strip_prefix(&self.root) {
            Ok(rel) => Ok(ResolvedPath {
                relative: rel.to_path_buf(),
                absolute: real,
            }),
            Err(_) => Err(VaultError::SecurityViolation(relative.to_path_buf())),
        }
    }

    /// Resolve a vault-relative path or bare note name to a note.
    ///
    /// Order: exact path, path + `.md`, unique name match anywhere in the
    /// vault (case-sensitive), then the same case-insensitively. Several
    /// name matches are ambiguous rather than a guess.
    pub fn resolve(&self, reference: &str) -> Result<ResolvedPath> {
        let reference = reference.trim().trim_matches('/');
        if reference.is_empty() {
            return Err(VaultError::NoteNotFound(PathBuf::new()));
        }
        let relative = Path::new(reference);
        reject_escaping_components(relative)?;

        if !is_under(relative, TRASH_DIR) {
            if self.root.join(relative).is_file() {
                tracing::debug!(reference, "resolved as exact path");
                return self.contain(relative);
            }
            if !reference.ends_with(".md") {
                let with_ext = PathBuf::from(format!("{}.md", reference));
                if self.root.join(&with_ext).is_file() {
                    tracing::debug!(reference, "resolved as path with .md");
                    return self.contain(&with_ext);
                }
            }
        }

        let key: String = reference
            .strip_suffix(".md")
            .unwrap_or(reference)
            .nfc()
            .collect();
        let notes = self.walk_notes()?;

        for case_sensitive in [true, false] {
            let matches: Vec<PathBuf> = notes
                .iter()
                .filter(|note| path_matches_name(note, &key, case_sensitive))
                .cloned()
                .collect();

            match matches.len() {
                0 => continue,
                1 => {
                    tracing::debug!(reference, case_sensitive, "resolved by name");
                    return self.contain(&matches[0]);
                }
                count => {
                    return Err(VaultError::AmbiguousResolution {
                        query: reference.to_string(),
                        count,
                        matches,
                    });
                }
            }
        }

        Err(VaultError::NoteNotFound(PathBuf::from(reference)))
    }

    /// Resolve an existing note that is about to be modified.
    pub fn resolve_for_write(&self, reference: &str) -> Result<ResolvedPath> {
        let resolved = self.resolve(reference)?;
        if is_under(resolved.relative(), HOST_CONFIG_DIR) {
            return Err(VaultError::ReservedPath(resolved.relative));
        }
        Ok(resolved)
    }

    /// Compute the location for a new or overwritten note. Appends `.md`,
    /// refuses reserved directories and anything that would land outside
    /// the vault. Missing parent directories are created.
    pub fn ensure_path(&self, relative: &str) -> Result<ResolvedPath> {
        let relative = self.normalize_note_path(relative);
        if relative.as_os_str() == ".md" {
            return Err(VaultError::Other("empty note path".to_string()));
        }
        reject_escaping_components(&relative)?;
        if is_under(&relative, HOST_CONFIG_DIR) || is_under(&relative, TRASH_DIR) {
            return Err(VaultError::ReservedPath(relative));
        }

        let full = self.root.join(&relative);
        if full.exists() || full.symlink_metadata().is_ok() {
            let resolved = self
                .contain(&relative)
                .map_err(|_| VaultError::SecurityViolation(relative.clone()))?;
            if is_under(resolved.relative(), HOST_CONFIG_DIR) {
                return Err(VaultError::ReservedPath(relative));
            }
            return Ok(resolved);
        }

        // Walk up to the nearest existing ancestor and check where it really is.
        let mut ancestor = full.parent();
        let mut remainder = Vec::new();
        if let Some(name) = full.file_name() {
            remainder.push(name.to_os_string());
        }
        while let Some(dir) = ancestor {
            if dir.exists() {
                break;
            }
            if let Some(name) = dir.file_name() {
                remainder.push(name.to_os_string());
            }
            ancestor = dir.parent();
        }

        let base = ancestor
            .ok_or_else(|| VaultError::SecurityViolation(relative.clone()))?
            .canonicalize()?;
        if !base.starts_with(&self.root) {
            return Err(VaultError::SecurityViolation(relative));
        }

        let mut absolute = base;
        for part in remainder.iter().rev() {
            absolute.push(part);
        }
        let rel = absolute
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .map_err(|_| VaultError::SecurityViolation(relative.clone()))?;
        if is_under(&rel, HOST_CONFIG_DIR) || is_under(&rel, TRASH_DIR) {
            return Err(VaultError::ReservedPath(relative));
        }
        if let Some(parent) = absolute.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Ok(ResolvedPath {
            absolute,
            relative: rel,
        })
    }

    /// Vault-relative form of an absolute path under the root.
    pub fn relative_of(&self, absolute: &Path) -> Option<PathBuf> {
        absolute.strip_prefix(&self.root).ok().map(Path::to_path_buf)
    }

    /// List folder entries (directories, notes and other files).
    ///
    /// `max_depth` counts path components below `folder` and only applies
    /// when `recursive` is set.
    pub fn entries(&self, folder: &str, recursive: bool, max_depth: usize) -> Result<Vec<NoteEntry>> {
        let folder = folder.trim().trim_matches('/');
        let folder_path = Path::new(folder);
        reject_escaping_components(folder_path)?;

        let base = if folder.is_empty() {
            self.root.clone()
        } else {
            self.root.join(folder_path)
        };
        if !base.is_dir() {
            return Ok(Vec::new());
        }
        let base = base.canonicalize()?;
        if !base.starts_with(&self.root) {
            return Err(VaultError::SecurityViolation(folder_path.to_path_buf()));
        }

        let suffix = if recursive { "**/*" } else { "*" };
        let pattern = format!("{}/{}", glob::Pattern::escape(&base.to_string_lossy()), suffix);

        let mut entries = Vec::new();
        for path in glob(&pattern)?.filter_map(|entry| entry.ok()) {
            let Ok(relative) = path.strip_prefix(&self.root) else {
                continue;
            };
            if is_skipped(relative) {
                continue;
            }
            let depth = path
                .strip_prefix(&base)
                .map(|p| p.components().count())
                .unwrap_or(0);
            if recursive && depth > max_depth {
                continue;
            }

            let metadata = std::fs::metadata(&path).ok();
            let modified = metadata
                .as_ref()
                .and_then(|m| m.modified().ok())
                .map(|t| chrono::DateTime::<chrono::Local>::from(t).format("%Y-%m-%d %H:%M").to_string());

            let kind = if path.is_dir() {
                EntryKind::Dir
            } else if path.extension().is_some_and(|e| e == "md") {
                EntryKind::Note
            } else {
                EntryKind::File
            };

            entries.push(NoteEntry {
                path: relative.to_path_buf(),
                kind,
                size_bytes: match kind {
                    EntryKind::Dir => None,
                    _ => metadata.as_ref().map(|m| m.len()),
                },
                modified,
            });
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}

/// Render a relative path with `/` separators.
pub fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// NFC plus lowercase, for name comparisons.
pub(crate) fn fold_name(name: &str) -> String {
    name.nfc().collect::<String>().to_lowercase()
}

/// Whether the first component of `relative` is `dir`.
pub(crate) fn is_under(relative: &Path, dir: &str) -> bool {
    relative
        .components()
        .next()
        .is_some_and(|c| c.as_os_str() == dir)
}

/// Hidden components (`.obsidian`, `.trash`, `.git`, ...) and known bulk
/// directories are never part of the note set.
fn is_skipped(relative: &Path) -> bool {
    relative.components().any(|c| {
        let part = c.as_os_str().to_string_lossy();
        part.starts_with('.') || SKIPPED_DIRS.contains(&part.as_ref())
    })
}

fn reject_escaping_components(relative: &Path) -> Result<()> {
    let escapes = relative
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
    if escapes {
        return Err(VaultError::SecurityViolation(relative.to_path_buf()));
    }
    Ok(())
}

/// Match a note path against a name or partial path, ignoring `.md`.
fn path_matches_name(note: &Path, key: &str, case_sensitive: bool) -> bool {
    let path = slash_path(note);
    let path = path.strip_suffix(".md").unwrap_or(&path);
    let path: String = path.nfc().collect();

    let (path, key) = if case_sensitive {
        (path, key.to_string())
    } else {
        (path.to_lowercase(), key.to_lowercase())
    };

    path == key || path.ends_with(&format!("/{}", key))
}
