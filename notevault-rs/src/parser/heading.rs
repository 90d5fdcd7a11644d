//! Heading parsing and lookup.

use crate::parser::code_block::{fenced_line_ranges, is_line_in_fenced_code_block};
use crate::types::Heading;
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

// ATX-style heading: # Heading, ## Heading, etc. A trailing block id is dropped.
static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,6})\s+(.+?)(?:\s+\^[a-zA-Z0-9_-]+)?\s*$").unwrap()
});

/// Parse all headings from content, skipping fenced code.
pub fn parse_headings(content: &str) -> Vec<Heading> {
    let fenced = fenced_line_ranges(content);
    let mut headings = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        let line_num = line_idx + 1;

        if is_line_in_fenced_code_block(line_num, &fenced) {
            continue;
        }

        if let Some(cap) = HEADING.captures(line) {
            headings.push(Heading {
                level: cap[1].len() as u8,
                text: cap[2].trim().to_string(),
                line: line_num,
            });
        }
    }

    headings
}

/// Split a heading query like `"## Notes"` into its level and text.
/// A query without `#` prefix has no level.
pub fn split_heading_query(query: &str) -> (Option<u8>, &str) {
    let query = query.trim();
    let hashes = query.chars().take_while(|&c| c == '#').count();
    if hashes == 0 {
        (None, query)
    } else {
        (Some(hashes.min(6) as u8), query[hashes..].trim())
    }
}

/// Find the heading a query refers to.
///
/// `"## Notes"` matches only a level-2 heading, `"Notes"` matches any level.
/// Exact text wins over a case-insensitive match.
pub fn find_heading<'a>(headings: &'a [Heading], query: &str) -> Option<&'a Heading> {
    let (level, text) = split_heading_query(query);
    let wanted: String = text.nfc().collect();
    let candidates = || {
        headings
            .iter()
            .filter(move |h| level.is_none_or(|l| h.level == l))
    };

    candidates()
        .find(|h| h.text.nfc().collect::<String>() == wanted)
        .or_else(|| {
            let wanted_lower = wanted.to_lowercase();
            candidates().find(|h| h.text.nfc().collect::<String>().to_lowercase() == wanted_lower)
        })
}

/// Line number (1-indexed) of the first line after the section that
/// `heading` opens: the next heading of equal or lesser depth, or
/// `total_lines + 1` when the section runs to the end.
pub fn section_end(headings: &[Heading], heading: &Heading, total_lines: usize) -> usize {
    headings
        .iter()
        .find(|h| h.line > heading.line && h.level <= heading.level)
        .map(|h| h.line)
        .unwrap_or(total_lines + 1)
}
