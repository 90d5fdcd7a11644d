//! Note templates: variable substitution, listing and instantiation.

use crate::daily::format_date;
use crate::error::{Result, VaultError};
use crate::store::NoteStore;
use crate::vault::{ResolvedPath, Vault};
use chrono::NaiveDateTime;
use regex::{Captures, Regex};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::LazyLock;

// {{date}}, {{time}}, {{date:FORMAT}}, {{time:FORMAT}}
static DATE_TIME_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(date|time)\s*(?::([^}]*))?\}\}").unwrap());

const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD";
const DEFAULT_TIME_FORMAT: &str = "HH:mm";

/// A template note.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub name: String,
    pub path: PathBuf,
}

/// Fill in a template. Built-in `{{date}}`, `{{time}}` (optionally with a
/// `:FORMAT` suffix) and `{{title}}` are replaced first, then each
/// caller variable `{{key}}`.
pub fn substitute(
    template: &str,
    title: &str,
    at: NaiveDateTime,
    vars: &BTreeMap<String, String>,
) -> String {
    let content = DATE_TIME_VAR.replace_all(template, |caps: &Captures| {
        let default = if &caps[1] == "date" {
            DEFAULT_DATE_FORMAT
        } else {
            DEFAULT_TIME_FORMAT
        };
        let format = caps
            .get(2)
            .map(|m| m.as_str().trim())
            .filter(|f| !f.is_empty())
            .unwrap_or(default);
        format_date(format, at)
    });

    let mut content = content.replace("{{title}}", title);
    for (key, value) in vars {
        content = content.replace(&format!("{{{{{}}}}}", key), value);
    }
    content
}

/// Notes in the configured templates folder, sorted by path.
pub fn list_templates(vault: &Vault) -> Result<Vec<TemplateInfo>> {
    let folder = PathBuf::from(vault.templates_config().folder);

    Ok(vault
        .list_notes()?
        .into_iter()
        .filter(|note| note.starts_with(&folder))
        .map(|path| TemplateInfo {
            name: path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path,
        })
        .collect())
}

/// Resolve a template by name, looking in the templates folder first.
pub fn resolve_template(vault: &Vault, template: &str) -> Result<ResolvedPath> {
    let folder = vault.templates_config().folder;
    match vault.resolve(&format!("{}/{}", folder, template.trim_matches('/'))) {
        Err(VaultError::NoteNotFound(_)) => vault.resolve(template),
        other => other,
    }
}

/// Create a note at `path` from a template. Fails if the note exists.
pub fn create_from_template(
    store: &NoteStore,
    template: &str,
    path: &str,
    vars: &BTreeMap<String, String>,
) -> Result<ResolvedPath> {
    let resolved = resolve_template(store.vault(), template)?;
    let text = std::fs::read_to_string(resolved.absolute())?;

    let title = path
        .trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path);
    let title = title.strip_suffix(".md").unwrap_or(title);
    let now = chrono::Local::now().naive_local();

    let content = substitute(&text, title, now, vars);
    let created = store.create(path, &content)?;
    tracing::info!(template = %resolved, path = %created, "created note from template");
    Ok(created)
}
