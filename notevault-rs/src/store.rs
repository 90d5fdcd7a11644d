//! Note reads and mutations on top of path resolution, frontmatter and
//! the link graph.

use crate::config::{AppConfig, DEFAULT_MAX_READ_BYTES, DailyNotesConfig, TemplatesConfig, TrashPolicy};
use crate::diff::unified_diff;
use crate::error::{Result, VaultError};
use crate::graph::{LinkGraph, RenameReport};
use crate::parser::{Frontmatter, find_heading, parse_headings, section_end, split_frontmatter};
use crate::types::NoteEntry;
use crate::vault::{ResolvedPath, TRASH_DIR, Vault, slash_path};
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions refused by `read` regardless of content.
const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "bmp", "ico", "tiff", "pdf", "zip", "gz", "tar", "7z",
    "mp3", "mp4", "m4a", "mov", "wav", "ogg", "flac", "webm", "exe", "dll", "so", "dylib",
];

/// Number of entries in [`VaultInfo::recent`].
const RECENT_NOTES: usize = 10;

/// A note as read from disk.
#[derive(Debug, Clone, Serialize)]
pub struct NoteContent {
    pub path: PathBuf,
    /// Full file text.
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frontmatter: Option<Mapping>,
    /// Text after the frontmatter block.
    pub body: String,
}

/// A literal replacement for [`NoteStore::edit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub old: String,
    pub new: String,
}

impl TextEdit {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EditOutcome {
    pub path: PathBuf,
    /// Unified diff of the change; empty when nothing changed.
    pub diff: String,
    /// Whether the file was written.
    pub applied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum DeleteOutcome {
    /// Moved into the trash directory.
    Trashed { path: PathBuf, to: PathBuf },
    /// Permanently removed.
    Removed { path: PathBuf },
}

#[derive(Debug, Clone, Serialize)]
pub struct MoveReport {
    pub from: PathBuf,
    pub to: PathBuf,
    pub rename: RenameReport,
}

impl MoveReport {
    /// The file itself always moved; this reports whether every link did.
    pub fn ensure_complete(&self) -> Result<()> {
        self.rename.ensure_complete()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentNote {
    pub path: PathBuf,
    pub modified: String,
}

/// Summary of a vault and its configuration.
#[derive(Debug, Clone, Serialize)]
pub struct VaultInfo {
    pub root: PathBuf,
    pub note_count: usize,
    pub folder_count: usize,
    pub daily_notes: DailyNotesConfig,
    pub templates: TemplatesConfig,
    pub trash_policy: TrashPolicy,
    /// Property types declared in the host's `types.json`.
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    pub property_types: serde_json::Map<String, serde_json::Value>,
    pub recent: Vec<RecentNote>,
}

/// Read and mutate notes in one vault.
#[derive(Debug, Clone)]
pub struct NoteStore {
    vault: Vault,
    trash_policy: TrashPolicy,
    max_read_bytes: u64,
}

impl NoteStore {
    pub fn new(vault: Vault) -> Self {
        Self {
            vault,
            trash_policy: TrashPolicy::default(),
            max_read_bytes: DEFAULT_MAX_READ_BYTES,
        }
    }

    /// Build a store with the policies from the notevault config file.
    pub fn with_config(vault: Vault, config: &AppConfig) -> Self {
        Self {
            vault,
            trash_policy: config.trash_policy,
            max_read_bytes: config.max_read_bytes,
        }
    }

    pub fn with_trash_policy(mut self, policy: TrashPolicy) -> Self {
        self.trash_policy = policy;
        self
    }

    pub fn with_max_read_bytes(mut self, limit: u64) -> Self {
        self.max_read_bytes = limit;
        self
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    pub fn graph(&self) -> LinkGraph<'_> {
        LinkGraph::new(&self.vault)
    }

    /// Read a note, refusing binary and oversized files.
    pub fn read(&self, reference: &str) -> Result<NoteContent> {
        let resolved = self.vault.resolve(reference)?;
        let path = resolved.relative().to_path_buf();

        let binary_ext = resolved
            .absolute()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| BINARY_EXTENSIONS.contains(&e.to_lowercase().as_str()));
        if binary_ext {
            return Err(VaultError::OversizeContent {
                path,
                reason: "binary file".to_string(),
            });
        }

        let size = fs::metadata(resolved.absolute())?.len();
        if size > self.max_read_bytes {
            return Err(VaultError::OversizeContent {
                path,
                reason: format!("{} bytes exceeds the {} byte limit", size, self.max_read_bytes),
            });
        }

        let content = String::from_utf8(fs::read(resolved.absolute())?).map_err(|_| {
            VaultError::OversizeContent {
                path: path.clone(),
                reason: "binary file (not valid UTF-8)".to_string(),
            }
        })?;

        let parsed = Frontmatter::parse_lenient(&content);
        Ok(NoteContent {
            path,
            frontmatter: (!parsed.fields.is_empty()).then_some(parsed.fields),
            body: parsed.body,
            content,
        })
    }

    /// Create or overwrite a note.
    pub fn write(&self, path: &str, content: &str) -> Result<ResolvedPath> {
        let target = self.vault.ensure_path(path)?;
        fs::write(target.absolute(), content)?;
        tracing::info!(path = %target, bytes = content.len(), "wrote note");
        Ok(target)
    }

    /// Create a note that must not exist yet.
    pub fn create(&self, path: &str, content: &str) -> Result<ResolvedPath> {
        let target = self.vault.ensure_path(path)?;
        if target.absolute().exists() {
            return Err(VaultError::NoteAlreadyExists(target.relative().to_path_buf()));
        }
        fs::write(target.absolute(), content)?;
        tracing::info!(path = %target, "created note");
        Ok(target)
    }

    /// Apply literal replacements in order. Each `old` text must occur
    /// exactly once in the text as it stands after the previous edits;
    /// otherwise nothing is written.
    pub fn edit(&self, reference: &str, edits: &[TextEdit], dry_run: bool) -> Result<EditOutcome> {
        let resolved = self.vault.resolve_for_write(reference)?;
        let path = resolved.relative().to_path_buf();

        if edits.is_empty() {
            return Err(VaultError::InvalidEdit {
                path,
                message: "no edits given".to_string(),
            });
        }

        let original = fs::read_to_string(resolved.absolute())?;
        let mut updated = original.clone();

        for edit in edits {
            if edit.old.is_empty() {
                return Err(VaultError::InvalidEdit {
                    path,
                    message: "search text is empty".to_string(),
                });
            }
            match updated.matches(edit.old.as_str()).count() {
                1 => updated = updated.replacen(&edit.old, &edit.new, 1),
                0 => {
                    return Err(VaultError::InvalidEdit {
                        path,
                        message: format!("text not found: {:?}", preview(&edit.old)),
                    });
                }
                n => {
                    return Err(VaultError::InvalidEdit {
                        path,
                        message: format!(
                            "text occurs {} times, add surrounding context: {:?}",
                            n,
                            preview(&edit.old)
                        ),
                    });
                }
            }
        }

        let diff = unified_diff(&original, &updated, &slash_path(&path));
        let applied = !dry_run && updated != original;
        if applied {
            fs::write(resolved.absolute(), &updated)?;
            tracing::info!(path = %resolved, edits = edits.len(), "edited note");
        }

        Ok(EditOutcome {
            path,
            diff,
            applied,
        })
    }

    /// Append content at the end of a note, or at the end of the section
    /// under `heading`. A missing heading is added at the end of the note.
    pub fn append(
        &self,
        reference: &str,
        content: &str,
        heading: Option<&str>,
        create_if_missing: bool,
    ) -> Result<ResolvedPath> {
        let resolved = match self.vault.resolve_for_write(reference) {
            Ok(resolved) => resolved,
            Err(VaultError::NoteNotFound(_)) if create_if_missing => {
                let target = self.vault.ensure_path(reference)?;
                fs::write(target.absolute(), "")?;
                target
            }
            Err(e) => return Err(e),
        };

        let existing = fs::read_to_string(resolved.absolute())?;
        let updated = match heading {
            Some(heading) => append_under_heading(&existing, content, heading),
            None => append_at_end(&existing, content),
        };
        fs::write(resolved.absolute(), updated)?;

        tracing::info!(path = %resolved, heading = heading.unwrap_or(""), "appended to note");
        Ok(resolved)
    }

    /// Move a note into the trash, keeping its relative path, or remove it
    /// when there is no trash directory and the policy allows that.
    pub fn delete(&self, reference: &str) -> Result<DeleteOutcome> {
        let resolved = self.vault.resolve_for_write(reference)?;
        let path = resolved.relative().to_path_buf();
        let trash = self.vault.trash_dir();

        if !trash.is_dir() && self.trash_policy == TrashPolicy::PermanentWhenMissing {
            fs::remove_file(resolved.absolute())?;
            tracing::info!(path = %resolved, "removed note permanently");
            return Ok(DeleteOutcome::Removed { path });
        }

        fs::create_dir_all(&trash)?;
        if !trash.canonicalize()?.starts_with(&self.vault.root) {
            return Err(VaultError::SecurityViolation(PathBuf::from(TRASH_DIR)));
        }

        let dest = unique_destination(&trash.join(&path));
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(resolved.absolute(), &dest)?;

        let to = self.vault.relative_of(&dest).unwrap_or(dest);
        tracing::info!(path = %resolved, to = %to.display(), "moved note to trash");
        Ok(DeleteOutcome::Trashed { path, to })
    }

    /// Move a trashed note back into the vault, to its old relative path
    /// or to `to` when given.
    pub fn restore(&self, trashed: &str, to: Option<&str>) -> Result<ResolvedPath> {
        let relative = trashed.trim().trim_matches('/');
        let relative = relative
            .strip_prefix(&format!("{}/", TRASH_DIR))
            .unwrap_or(relative);

        let trash = self.vault.trash_dir();
        let source = trash.join(relative);
        if relative.is_empty() || !source.is_file() {
            return Err(VaultError::NoteNotFound(Path::new(TRASH_DIR).join(relative)));
        }
        if !source.canonicalize()?.starts_with(trash.canonicalize()?) {
            return Err(VaultError::SecurityViolation(PathBuf::from(relative)));
        }

        let target = self.vault.ensure_path(to.unwrap_or(relative))?;
        if target.absolute().exists() {
            return Err(VaultError::NoteAlreadyExists(target.relative().to_path_buf()));
        }
        fs::rename(&source, target.absolute())?;

        tracing::info!(from = relative, to = %target, "restored note from trash");
        Ok(target)
    }

    /// Move or rename a note, then rewrite links to it across the vault.
    ///
    /// The move itself is not undone when link rewriting fails for some
    /// notes; check [`MoveReport::ensure_complete`].
    pub fn move_note(&self, source: &str, destination: &str) -> Result<MoveReport> {
        let from = self.vault.resolve_for_write(source)?;

        let target = self.vault.ensure_path(destination)?;
        if target.absolute().exists() {
            return Err(VaultError::NoteAlreadyExists(target.relative().to_path_buf()));
        }

        let referring = self.graph().names_resolving_to(&from)?;

        fs::rename(from.absolute(), target.absolute())?;
        tracing::info!(from = %from, to = %target, "moved note");

        let rename = self.graph().propagate_rename(&referring, &target)?;
        if !rename.is_complete() {
            tracing::warn!(failed = rename.failed.len(), "link propagation incomplete");
        }

        Ok(MoveReport {
            from: from.relative().to_path_buf(),
            to: target.relative().to_path_buf(),
            rename,
        })
    }

    /// Frontmatter fields of a note (empty when it has none).
    pub fn frontmatter(&self, reference: &str) -> Result<Mapping> {
        let resolved = self.vault.resolve(reference)?;
        let content = fs::read_to_string(resolved.absolute())?;
        Ok(Frontmatter::parse_with_path(&content, resolved.relative())?.fields)
    }

    /// Set and remove frontmatter keys, leaving the body untouched.
    /// Returns the resulting fields.
    pub fn update_frontmatter(
        &self,
        reference: &str,
        set: &Mapping,
        remove: &[String],
    ) -> Result<Mapping> {
        let resolved = self.vault.resolve_for_write(reference)?;
        let content = fs::read_to_string(resolved.absolute())?;

        let mut frontmatter = Frontmatter::parse_with_path(&content, resolved.relative())?;
        frontmatter.merge(set, remove);
        fs::write(resolved.absolute(), frontmatter.render()?)?;

        tracing::info!(path = %resolved, set = set.len(), removed = remove.len(), "updated frontmatter");
        Ok(frontmatter.fields)
    }

    /// List a folder's directories, notes and other files.
    pub fn list(&self, folder: &str, recursive: bool, max_depth: usize) -> Result<Vec<NoteEntry>> {
        self.vault.entries(folder, recursive, max_depth)
    }

    pub fn vault_info(&self) -> Result<VaultInfo> {
        let notes = self.vault.list_notes()?;

        let mut dated: Vec<(PathBuf, std::time::SystemTime)> = notes
            .iter()
            .filter_map(|note| {
                let modified = fs::metadata(self.vault.root.join(note))
                    .and_then(|m| m.modified())
                    .ok()?;
                Some((note.clone(), modified))
            })
            .collect();
        dated.sort_by(|a, b| b.1.cmp(&a.1));

        let recent = dated
            .into_iter()
            .take(RECENT_NOTES)
            .map(|(path, modified)| RecentNote {
                path,
                modified: chrono::DateTime::<chrono::Local>::from(modified)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
            })
            .collect();

        let folder_count = self
            .vault
            .entries("", true, usize::MAX)?
            .iter()
            .filter(|e| e.kind == crate::types::EntryKind::Dir)
            .count();

        Ok(VaultInfo {
            root: self.vault.root.clone(),
            note_count: notes.len(),
            folder_count,
            daily_notes: self.vault.daily_notes_config(),
            templates: self.vault.templates_config(),
            trash_policy: self.trash_policy,
            property_types: self.vault.property_types(),
            recent,
        })
    }
}

fn preview(text: &str) -> String {
    text.chars().take(80).collect()
}

/// Content ending in exactly one newline.
fn as_block(content: &str) -> String {
    format!("{}\n", content.trim_end_matches(['\n', '\r']))
}

fn append_at_end(existing: &str, content: &str) -> String {
    let mut out = existing.to_string();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&as_block(content));
    out
}

/// Insert content as the last non-blank lines of the section under
/// `heading`. Blank lines closing the section stay after the insertion.
/// Headings are only looked for in the body, never in frontmatter.
fn append_under_heading(existing: &str, content: &str, heading: &str) -> String {
    let body = split_frontmatter(existing).content;
    let header = &existing[..existing.len() - body.len()];
    format!("{}{}", header, append_to_section(body, content, heading))
}

fn append_to_section(existing: &str, content: &str, heading: &str) -> String {
    let headings = parse_headings(existing);

    let Some(found) = find_heading(&headings, heading) else {
        let heading = heading.trim();
        let heading_line = if heading.starts_with('#') {
            heading.to_string()
        } else {
            format!("## {}", heading)
        };
        let mut out = existing.to_string();
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&format!("\n{}\n\n{}", heading_line, as_block(content)));
        return out;
    };

    let line_starts: Vec<usize> = existing
        .split_inclusive('\n')
        .scan(0, |offset, line| {
            let start = *offset;
            *offset += line.len();
            Some(start)
        })
        .collect();
    let lines: Vec<&str> = existing.lines().collect();
    let end = section_end(&headings, found, lines.len());

    let last_content_line = (found.line + 1..end)
        .filter(|&n| lines.get(n - 1).is_some_and(|l| !l.trim().is_empty()))
        .last()
        .unwrap_or(found.line);

    let offset = line_starts
        .get(last_content_line)
        .copied()
        .unwrap_or(existing.len());

    let mut out = String::with_capacity(existing.len() + content.len() + 2);
    out.push_str(&existing[..offset]);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&as_block(content));
    out.push_str(&existing[offset..]);
    out
}

/// `path`, or `stem_1.ext`, `stem_2.ext`, ... if taken.
fn unique_destination(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1;
    loop {
        let candidate = path.with_file_name(format!("{}_{}{}", stem, counter, ext));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}
