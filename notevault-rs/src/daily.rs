//! Daily notes: moment-style date formatting and locating, creating and
//! appending to the note for a given day.

use crate::error::{Result, VaultError};
use crate::store::NoteStore;
use crate::template::substitute;
use crate::vault::ResolvedPath;
use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Format tokens, longest first so `MMMM` wins over `MM` and `M`.
const TOKENS: &[&str] = &[
    "YYYY", "MMMM", "DDDD", "dddd", "MMM", "DDD", "ddd", "YY", "MM", "Do", "DD", "dd", "HH", "hh",
    "mm", "ss", "M", "D", "d", "H", "h", "m", "s", "A", "a",
];

/// Format a date with moment.js-style tokens. Text in `[...]` is copied
/// literally; anything that is not a token passes through unchanged.
pub fn format_date(format: &str, at: NaiveDateTime) -> String {
    let mut out = String::with_capacity(format.len() + 8);
    let mut rest = format;

    while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(close) = rest.find(']') {
                out.push_str(&rest[1..close]);
                rest = &rest[close + 1..];
                continue;
            }
        }

        match TOKENS.iter().find(|t| rest.starts_with(**t)) {
            Some(token) => {
                out.push_str(&render_token(token, at));
                rest = &rest[token.len()..];
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    out
}

fn render_token(token: &str, at: NaiveDateTime) -> String {
    let (pm, hour12) = at.hour12();
    match token {
        "YYYY" => format!("{:04}", at.year()),
        "YY" => format!("{:02}", at.year().rem_euclid(100)),
        "MMMM" => at.format("%B").to_string(),
        "MMM" => at.format("%b").to_string(),
        "MM" => format!("{:02}", at.month()),
        "M" => at.month().to_string(),
        "DDDD" => format!("{:03}", at.ordinal()),
        "DDD" => at.ordinal().to_string(),
        "DD" => format!("{:02}", at.day()),
        "Do" => ordinal(at.day()),
        "D" => at.day().to_string(),
        "dddd" => at.format("%A").to_string(),
        "ddd" => at.format("%a").to_string(),
        "dd" => at.format("%a").to_string().chars().take(2).collect(),
        "d" => at.weekday().num_days_from_sunday().to_string(),
        "HH" => format!("{:02}", at.hour()),
        "H" => at.hour().to_string(),
        "hh" => format!("{:02}", hour12),
        "h" => hour12.to_string(),
        "mm" => format!("{:02}", at.minute()),
        "m" => at.minute().to_string(),
        "ss" => format!("{:02}", at.second()),
        "s" => at.second().to_string(),
        "A" => (if pm { "PM" } else { "AM" }).to_string(),
        "a" => (if pm { "pm" } else { "am" }).to_string(),
        _ => token.to_string(),
    }
}

/// `1st`, `2nd`, `3rd`, `4th`, ..., `11th`, `12th`, `13th`, `21st`.
fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// Which day's note to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyTarget {
    /// Days from today (local time); negative is the past.
    Offset(i64),
    Date(NaiveDate),
}

impl DailyTarget {
    /// Parse an ISO `YYYY-MM-DD` date.
    pub fn parse_date(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(DailyTarget::Date)
            .map_err(|_| VaultError::InvalidDate(s.to_string()))
    }

    pub fn date(&self, today: NaiveDate) -> Result<NaiveDate> {
        match *self {
            DailyTarget::Date(date) => Ok(date),
            DailyTarget::Offset(days) => {
                let shifted = if days >= 0 {
                    today.checked_add_days(Days::new(days.unsigned_abs()))
                } else {
                    today.checked_sub_days(Days::new(days.unsigned_abs()))
                };
                shifted.ok_or_else(|| VaultError::InvalidDate(format!("{} days from {}", days, today)))
            }
        }
    }
}

impl Default for DailyTarget {
    fn default() -> Self {
        DailyTarget::Offset(0)
    }
}

/// A located daily note.
#[derive(Debug, Clone, Serialize)]
pub struct DailyNote {
    pub path: PathBuf,
    pub content: String,
    /// Whether this call created the note.
    pub created: bool,
}

/// Daily note operations using the host's daily notes settings.
pub struct DailyNotes<'a> {
    store: &'a NoteStore,
}

impl<'a> DailyNotes<'a> {
    pub fn new(store: &'a NoteStore) -> Self {
        Self { store }
    }

    /// Vault-relative path (with `.md`) of the note for `date`.
    pub fn path_for(&self, date: NaiveDate) -> String {
        let config = self.store.vault().daily_notes_config();
        let name = format_date(&config.format, date.and_time(chrono::NaiveTime::MIN));
        if config.folder.is_empty() {
            format!("{}.md", name)
        } else {
            format!("{}/{}.md", config.folder, name)
        }
    }

    /// Find the daily note, creating it from the configured template when
    /// missing and `create` is set.
    pub fn locate(&self, target: DailyTarget, create: bool) -> Result<DailyNote> {
        let now = Local::now().naive_local();
        let date = target.date(now.date())?;
        let relative = self.path_for(date);
        let vault = self.store.vault();

        if vault.root.join(&relative).is_file() {
            let resolved = vault.resolve(&relative)?;
            let content = std::fs::read_to_string(resolved.absolute())?;
            return Ok(DailyNote {
                path: resolved.relative().to_path_buf(),
                content,
                created: false,
            });
        }

        if !create {
            return Err(VaultError::NoteNotFound(PathBuf::from(relative)));
        }

        let title = relative
            .rsplit('/')
            .next()
            .unwrap_or(&relative)
            .trim_end_matches(".md")
            .to_string();
        let content = match self.template_text()? {
            Some(text) => substitute(&text, &title, date.and_time(now.time()), &BTreeMap::new()),
            None => String::new(),
        };

        let created = self.store.create(&relative, &content)?;
        tracing::info!(path = %created, %date, "created daily note");
        Ok(DailyNote {
            path: created.relative().to_path_buf(),
            content,
            created: true,
        })
    }

    fn template_text(&self) -> Result<Option<String>> {
        let vault = self.store.vault();
        let template = vault.daily_notes_config().template;
        if template.trim().is_empty() {
            return Ok(None);
        }

        match vault.resolve(&template) {
            Ok(resolved) => Ok(Some(std::fs::read_to_string(resolved.absolute())?)),
            Err(e @ (VaultError::NoteNotFound(_) | VaultError::AmbiguousResolution { .. })) => {
                tracing::warn!(%template, error = %e, "daily note template unavailable, starting empty");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Append to a daily note, optionally under a heading.
    pub fn append(
        &self,
        target: DailyTarget,
        content: &str,
        heading: Option<&str>,
        create: bool,
    ) -> Result<ResolvedPath> {
        let note = self.locate(target, create)?;
        self.store
            .append(&note.path.to_string_lossy(), content, heading, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::Vault;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_format_iso_date() {
        assert_eq!(format_date("YYYY-MM-DD", day(2026, 2, 26)), "2026-02-26");
    }

    #[test]
    fn test_format_long_date() {
        assert_eq!(
            format_date("dddd, MMMM D", day(2026, 2, 26)),
            "Thursday, February 26"
        );
    }

    #[test]
    fn test_format_short_tokens() {
        let at = day(2026, 3, 5);
        assert_eq!(format_date("YY/M/D ddd MMM", at), "26/3/5 Thu Mar");
        assert_eq!(format_date("dd d", at), "Th 4");
        assert_eq!(format_date("DDD DDDD", at), "64 064");
    }

    #[test]
    fn test_format_ordinals() {
        let cases = [
            (1, "1st"),
            (2, "2nd"),
            (3, "3rd"),
            (4, "4th"),
            (11, "11th"),
            (12, "12th"),
            (13, "13th"),
            (21, "21st"),
            (22, "22nd"),
            (31, "31st"),
        ];
        for (d, expected) in cases {
            assert_eq!(format_date("Do", day(2026, 1, d)), expected);
        }
    }

    #[test]
    fn test_format_time_tokens() {
        let at = NaiveDate::from_ymd_opt(2026, 2, 26)
            .unwrap()
            .and_hms_opt(0, 7, 3)
            .unwrap();
        assert_eq!(format_date("HH:mm:ss H h hh A a", at), "00:07:03 0 12 12 AM am");
    }

    #[test]
    fn test_format_escapes_and_literals() {
        assert_eq!(
            format_date("[Week of] YYYY-MM-DD", day(2026, 2, 26)),
            "Week of 2026-02-26"
        );
        assert_eq!(format_date("YYYY/MM/DD-Log", day(2026, 2, 26)), "2026/02/26-Log");
        assert_eq!(format_date("[open YYYY", day(2026, 2, 26)), "[open 2026");
        assert_eq!(format_date("", day(2026, 2, 26)), "");
    }

    #[test]
    fn test_target_dates() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(
            DailyTarget::Offset(-1).date(today).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
        );
        assert_eq!(
            DailyTarget::parse_date("2026-02-26").unwrap(),
            DailyTarget::Date(NaiveDate::from_ymd_opt(2026, 2, 26).unwrap())
        );
        assert!(matches!(
            DailyTarget::parse_date("26/02/2026"),
            Err(VaultError::InvalidDate(_))
        ));
    }

    fn setup(config: Option<&str>) -> (TempDir, NoteStore) {
        let temp = TempDir::new().unwrap();
        if let Some(config) = config {
            fs::create_dir_all(temp.path().join(".obsidian")).unwrap();
            fs::write(temp.path().join(".obsidian/daily-notes.json"), config).unwrap();
        }
        let store = NoteStore::new(Vault::open(temp.path()).unwrap());
        (temp, store)
    }

    #[test]
    fn test_locate_missing_without_create() {
        let (_temp, store) = setup(None);
        let target = DailyTarget::parse_date("2026-02-26").unwrap();
        assert!(matches!(
            DailyNotes::new(&store).locate(target, false),
            Err(VaultError::NoteNotFound(_))
        ));
    }

    #[test]
    fn test_locate_creates_from_template() {
        let (temp, store) = setup(Some(
            r#"{"folder": "Journal", "format": "YYYY/MM/YYYY-MM-DD", "template": "Templates/Daily"}"#,
        ));
        fs::create_dir_all(temp.path().join("Templates")).unwrap();
        fs::write(
            temp.path().join("Templates/Daily.md"),
            "# {{title}}\n{{date:dddd}}\n\n## Log\n",
        )
        .unwrap();

        let daily = DailyNotes::new(&store);
        let target = DailyTarget::parse_date("2026-02-26").unwrap();

        let note = daily.locate(target, true).unwrap();
        assert!(note.created);
        assert_eq!(note.path, PathBuf::from("Journal/2026/02/2026-02-26.md"));
        assert_eq!(note.content, "# 2026-02-26\nThursday\n\n## Log\n");

        let again = daily.locate(target, true).unwrap();
        assert!(!again.created);
        assert_eq!(again.content, note.content);
    }

    #[test]
    fn test_missing_template_gives_empty_note() {
        let (_temp, store) = setup(Some(r#"{"template": "Nowhere"}"#));
        let target = DailyTarget::parse_date("2026-02-26").unwrap();
        let note = DailyNotes::new(&store).locate(target, true).unwrap();
        assert_eq!(note.path, PathBuf::from("2026-02-26.md"));
        assert_eq!(note.content, "");
    }

    #[test]
    fn test_daily_append_under_heading() {
        let (temp, store) = setup(None);
        fs::write(temp.path().join("2026-02-26.md"), "## Log\n- a\n\n## Done\n").unwrap();

        let target = DailyTarget::parse_date("2026-02-26").unwrap();
        DailyNotes::new(&store)
            .append(target, "- b", Some("Log"), false)
            .unwrap();

        assert_eq!(
            fs::read_to_string(temp.path().join("2026-02-26.md")).unwrap(),
            "## Log\n- a\n- b\n\n## Done\n"
        );
    }
}
