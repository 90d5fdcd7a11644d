//! Inline tag parsing (#tag and #tag/subtag).

use crate::parser::code_block::{fenced_line_ranges, inline_code_ranges, is_line_in_fenced_code_block};
use crate::types::Tag;
use regex::Regex;
use std::sync::LazyLock;

// Rust regex has no lookbehind: match the preceding boundary, then check
// the following character by hand. Tags cannot start with a digit.
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\w&])#([a-zA-Z_][\w/-]*)").unwrap());

/// Parse all inline tags, skipping code and wikilinks.
pub fn parse_tags(content: &str) -> Vec<Tag> {
    let fenced = fenced_line_ranges(content);
    let inline = inline_code_ranges(content);
    let mut tags = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        let line_num = line_idx + 1;
        if is_line_in_fenced_code_block(line_num, &fenced) {
            continue;
        }
        let line_offset = line.as_ptr() as usize - content.as_ptr() as usize;

        for cap in TAG.captures_iter(line) {
            let Some(tag_match) = cap.get(1) else { continue };
            let start = tag_match.start() - 1;
            let end = tag_match.end();

            let followed_by_word = line[end..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '/');
            if followed_by_word {
                continue;
            }

            let absolute = line_offset + start;
            if inline.iter().any(|r| r.contains(&absolute)) || is_in_wikilink(line, start) {
                continue;
            }

            tags.push(Tag {
                name: format!("#{}", tag_match.as_str()),
                line: line_num,
            });
        }
    }

    tags
}

/// Check if a position is between `[[` and `]]` on the same line.
fn is_in_wikilink(line: &str, pos: usize) -> bool {
    let before = &line[..pos];
    match (before.rfind("[["), before.rfind("]]")) {
        (Some(open), Some(close)) if open < close => false,
        (Some(_), _) => line[pos..].contains("]]"),
        _ => false,
    }
}

/// Whether `tag` (with or without `#`) equals `wanted` or is nested under
/// it, case-insensitively: `#project/active` matches `project`.
pub fn tag_matches(tag: &str, wanted: &str) -> bool {
    let tag = tag.trim_start_matches('#').to_lowercase();
    let wanted = wanted.trim_start_matches('#').to_lowercase();
    tag == wanted || tag.starts_with(&format!("{}/", wanted))
}
