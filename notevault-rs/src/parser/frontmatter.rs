//! YAML frontmatter splitting, parsing and rendering.

use crate::error::{Result, VaultError};
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Frontmatter extraction result.
#[derive(Debug, Clone)]
pub struct FrontmatterSplit<'a> {
    /// The raw YAML string (without delimiters).
    pub yaml: Option<&'a str>,
    /// The content after the frontmatter.
    pub content: &'a str,
    /// Line number where content starts (1-indexed).
    pub content_start_line: usize,
}

/// Split content into frontmatter and body.
///
/// The block must open with a `---` line at the very start of the content
/// and close with the next line consisting of `---`.
pub fn split_frontmatter(content: &str) -> FrontmatterSplit<'_> {
    let no_frontmatter = FrontmatterSplit {
        yaml: None,
        content,
        content_start_line: 1,
    };

    let yaml_start = if content.starts_with("---\n") {
        4
    } else if content.starts_with("---\r\n") {
        5
    } else {
        return no_frontmatter;
    };

    let mut pos = yaml_start;
    let mut line_no = 2;

    loop {
        let line_end = content[pos..].find('\n').map(|i| pos + i);
        let line = &content[pos..line_end.unwrap_or(content.len())];

        if line.trim_end_matches('\r') == "---" {
            let yaml = &content[yaml_start..pos];
            let yaml = yaml
                .strip_suffix('\n')
                .map(|y| y.strip_suffix('\r').unwrap_or(y))
                .unwrap_or(yaml);
            let body_start = line_end.map(|e| e + 1).unwrap_or(content.len());
            return FrontmatterSplit {
                yaml: Some(yaml),
                content: &content[body_start..],
                content_start_line: line_no + 1,
            };
        }

        match line_end {
            Some(end) => {
                pos = end + 1;
                line_no += 1;
            }
            // No closing delimiter
            None => return no_frontmatter,
        }
    }
}

/// A document split into ordered metadata fields and a body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frontmatter {
    /// Fields in document order.
    pub fields: Mapping,
    /// Everything after the closing delimiter.
    pub body: String,
}

impl Frontmatter {
    pub fn new(fields: Mapping, body: impl Into<String>) -> Self {
        Self {
            fields,
            body: body.into(),
        }
    }

    /// Parse a document. Invalid YAML or a non-mapping block is an error.
    pub fn parse(content: &str) -> Result<Self> {
        Self::parse_with_path(content, Path::new("<unknown>"))
    }

    /// Parse with path context for error messages.
    pub fn parse_with_path(content: &str, path: &Path) -> Result<Self> {
        let split = split_frontmatter(content);
        let Some(yaml) = split.yaml else {
            return Ok(Self::new(Mapping::new(), content));
        };

        let invalid = |message: String| VaultError::InvalidFrontmatter {
            path: path.to_path_buf(),
            message,
        };

        let value: Value = serde_yaml::from_str(yaml).map_err(|e| invalid(e.to_string()))?;
        let fields = match value {
            Value::Mapping(map) => map,
            Value::Null => Mapping::new(),
            other => {
                return Err(invalid(format!(
                    "expected a mapping, found {}",
                    value_kind(&other)
                )));
            }
        };

        Ok(Self::new(fields, split.content))
    }

    /// Parse, treating a broken block as plain body text.
    pub fn parse_lenient(content: &str) -> Self {
        Self::parse(content).unwrap_or_else(|_| Self::new(Mapping::new(), content))
    }

    /// Reassemble the document. Empty fields emit the body verbatim.
    pub fn render(&self) -> Result<String> {
        if self.fields.is_empty() {
            return Ok(self.body.clone());
        }
        let yaml = serde_yaml::to_string(&self.fields)?;
        Ok(format!("---\n{}---\n{}", yaml, self.body))
    }

    /// Overwrite or append each key of `set`, then drop each key in `remove`.
    /// Existing keys keep their position; new keys land at the end in order.
    pub fn merge(&mut self, set: &Mapping, remove: &[String]) {
        for (key, value) in set {
            self.fields.insert(key.clone(), value.clone());
        }
        for key in remove {
            self.fields.shift_remove(key.as_str());
        }
    }

    /// Look up a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Values of the `aliases` field (string or list of strings).
    pub fn aliases(&self) -> Vec<String> {
        string_list(self.get("aliases"))
    }

    /// Values of the `tags` field (string or list), without a leading `#`.
    pub fn tags(&self) -> Vec<String> {
        string_list(self.get("tags"))
            .into_iter()
            .map(|t| t.trim_start_matches('#').to_string())
            .collect()
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Sequence(seq)) => seq
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
