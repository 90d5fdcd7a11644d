//! Code block detection for skipping parsing inside code.

use regex::Regex;
use std::ops::{Range, RangeInclusive};
use std::sync::LazyLock;

// Inline code with single backticks, on one line
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`\n]+`").unwrap());

/// Line ranges (1-indexed, inclusive) covered by fenced code blocks.
///
/// A fence opens with three or more backticks or tildes and closes with a
/// line of the same character at least as long. An unclosed fence runs to
/// the end of the document.
pub fn fenced_line_ranges(content: &str) -> Vec<RangeInclusive<usize>> {
    let mut ranges = Vec::new();
    let mut open: Option<(char, usize, usize)> = None;
    let mut last_line = 0;

    for (idx, line) in content.lines().enumerate() {
        let line_num = idx + 1;
        last_line = line_num;
        let trimmed = line.trim();

        match open {
            None => {
                if let Some((fence_char, fence_len)) = fence_marker(trimmed) {
                    open = Some((fence_char, fence_len, line_num));
                }
            }
            Some((fence_char, fence_len, start)) => {
                if trimmed.len() >= fence_len && trimmed.chars().all(|c| c == fence_char) {
                    ranges.push(start..=line_num);
                    open = None;
                }
            }
        }
    }

    if let Some((_, _, start)) = open {
        ranges.push(start..=last_line);
    }

    ranges
}

fn fence_marker(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let len = trimmed.chars().take_while(|&c| c == first).count();
    (len >= 3).then_some((first, len))
}

/// Check if a line number is inside any fenced code block.
pub fn is_line_in_fenced_code_block(line: usize, ranges: &[RangeInclusive<usize>]) -> bool {
    ranges.iter().any(|r| r.contains(&line))
}

/// Byte ranges of inline code spans outside fenced blocks.
pub fn inline_code_ranges(content: &str) -> Vec<Range<usize>> {
    let fenced = fenced_line_ranges(content);
    INLINE_CODE
        .find_iter(content)
        .filter(|m| {
            let line = content[..m.start()].matches('\n').count() + 1;
            !is_line_in_fenced_code_block(line, &fenced)
        })
        .map(|m| m.range())
        .collect()
}
