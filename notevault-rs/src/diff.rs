//! Unified diffs for edit previews.

use similar::TextDiff;

/// Lines of unchanged context around each hunk.
const CONTEXT_LINES: usize = 3;

/// Render a unified diff between two versions of a note, with `a/` and
/// `b/` headers. Identical inputs give an empty string.
pub fn unified_diff(old: &str, new: &str, path: &str) -> String {
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .header(&format!("a/{}", path), &format!("b/{}", path))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unified_diff_headers_and_lines() {
        let diff = unified_diff("one\ntwo\nthree\n", "one\n2\nthree\n", "notes/n.md");
        assert!(diff.starts_with("--- a/notes/n.md\n+++ b/notes/n.md\n"));
        assert!(diff.contains("@@ -1,3 +1,3 @@"));
        assert!(diff.contains("-two\n"));
        assert!(diff.contains("+2\n"));
    }

    #[test]
    fn test_no_changes_is_empty() {
        assert_eq!(unified_diff("same\n", "same\n", "n.md"), "");
    }
}
