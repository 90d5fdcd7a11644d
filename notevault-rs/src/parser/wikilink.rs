//! Wikilink and embed parsing.
//!
//! Links inside code blocks are reported like any other link.

use crate::types::LinkReference;
use regex::{CaptureMatches, Regex};
use std::sync::LazyLock;

// (!)?                     - Optional ! for embeds (group 1)
// \[\[                     - Opening [[
// ([^\]\|#]+)              - Target path (group 2)
// (?:#\^([a-zA-Z0-9_-]+))? - Block reference (group 3)
// (?:#([^\]\|]+))?         - Heading reference (group 4)
// (?:\|([^\]]+))?          - Alias (group 5)
// \]\]                     - Closing ]]
static WIKILINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(!?)\[\[([^\]\|#]+)(?:#\^([a-zA-Z0-9_-]+))?(?:#([^\]\|]+))?(?:\|([^\]]+))?\]\]")
        .unwrap()
});

/// Lazy iterator over the links of a document, in document order.
pub struct Links<'a> {
    content: &'a str,
    captures: CaptureMatches<'static, 'a>,
    // Line bookkeeping carried between matches
    scanned_to: usize,
    line: usize,
    line_start: usize,
}

impl<'a> Iterator for Links<'a> {
    type Item = LinkReference;

    fn next(&mut self) -> Option<LinkReference> {
        let cap = self.captures.next()?;
        let full_match = cap.get(0)?;
        let start = full_match.start();
        let end = full_match.end();

        let skipped = &self.content[self.scanned_to..start];
        if let Some(last_newline) = skipped.rfind('\n') {
            self.line += skipped.matches('\n').count();
            self.line_start = self.scanned_to + last_newline + 1;
        }
        self.scanned_to = start;

        let raw_target = cap.get(2)?;
        let leading = raw_target.as_str().len() - raw_target.as_str().trim_start().len();
        let target = raw_target.as_str().trim();
        let target_start = raw_target.start() + leading;

        Some(LinkReference {
            target: target.to_string(),
            alias: cap.get(5).map(|m| m.as_str().to_string()),
            heading: cap.get(4).map(|m| m.as_str().to_string()),
            block_id: cap.get(3).map(|m| m.as_str().to_string()),
            embed: cap.get(1).is_some_and(|m| !m.as_str().is_empty()),
            line: self.line,
            start_col: start - self.line_start,
            end_col: end - self.line_start,
            target_range: target_start..target_start + target.len(),
        })
    }
}

/// Parse all wikilinks and embeds from content, lazily.
pub fn parse_links(content: &str) -> Links<'_> {
    Links {
        content,
        captures: WIKILINK.captures_iter(content),
        scanned_to: 0,
        line: 1,
        line_start: 0,
    }
}

/// Parse only embeds (`![[...]]`).
pub fn parse_embeds(content: &str) -> impl Iterator<Item = LinkReference> + '_ {
    parse_links(content).filter(|link| link.embed)
}

/// Format a wikilink as a string.
pub fn format_wikilink(link: &LinkReference) -> String {
    let mut result = String::new();

    if link.embed {
        result.push('!');
    }

    result.push_str("[[");
    result.push_str(&link.target);

    if let Some(ref heading) = link.heading {
        result.push('#');
        result.push_str(heading);
    }

    if let Some(ref block_id) = link.block_id {
        result.push_str("#^");
        result.push_str(block_id);
    }

    if let Some(ref alias) = link.alias {
        result.push('|');
        result.push_str(alias);
    }

    result.push_str("]]");
    result
}
