//! Output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::error::Result;
use serde::Serialize;

/// Helper for formatting and printing output.
pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Render a serializable value in the configured format.
    pub fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        Ok(match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
            OutputFormat::Toml => toml::to_string_pretty(value)?,
        })
    }

    /// Print a serializable value in the configured format.
    pub fn print<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", self.render(value)?.trim_end());
        Ok(())
    }

    /// Print raw text (not serialized).
    pub fn print_raw(&self, text: &str) {
        print!("{}", text);
        if !text.ends_with('\n') {
            println!();
        }
    }

    /// Print a message to stderr unless in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }

    /// Print a warning message.
    pub fn warn(&self, message: &str) {
        eprintln!("Warning: {}", message);
    }
}

/// Result of a command that changed one note.
#[derive(Debug, Serialize)]
pub struct ModifyResponse {
    pub path: String,
    pub message: String,
}

/// Wrapper that keeps list results serializable as a TOML table.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub total: usize,
    pub items: Vec<T>,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            total: items.len(),
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Serialize)]
    struct Sample {
        name: &'static str,
    }

    #[test]
    fn test_render_formats() {
        let value = ListResponse::from(vec![Sample { name: "a" }]);

        let json = Output::new(OutputFormat::Json, false).render(&value).unwrap();
        assert!(json.contains("\"total\": 1"));

        let yaml = Output::new(OutputFormat::Yaml, false).render(&value).unwrap();
        assert!(yaml.contains("name: a"));

        let toml = Output::new(OutputFormat::Toml, false).render(&value).unwrap();
        assert!(toml.contains("total = 1"));
    }

    #[test]
    fn test_list_response_total() {
        let value: ListResponse<u8> = vec![1, 2, 3].into();
        assert_eq!(value.total, 3);
    }
}
