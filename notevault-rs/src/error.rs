//! Error types and exit codes for notevault.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes for the CLI.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOTE_NOT_FOUND: i32 = 2;
    pub const NOTE_ALREADY_EXISTS: i32 = 3;
    pub const AMBIGUOUS_RESOLUTION: i32 = 4;
    pub const INVALID_FRONTMATTER: i32 = 5;
    pub const SECURITY_VIOLATION: i32 = 6;
    pub const RESERVED_PATH: i32 = 7;
    pub const INVALID_EDIT: i32 = 8;
    pub const OVERSIZE_CONTENT: i32 = 9;
    pub const PARTIAL_FAILURE: i32 = 11;
}

/// Main error type for vault operations.
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Note not found: {0}")]
    NoteNotFound(PathBuf),

    #[error("Note already exists: {0}")]
    NoteAlreadyExists(PathBuf),

    #[error("Ambiguous resolution: {count} notes match '{query}', use a longer path")]
    AmbiguousResolution {
        query: String,
        count: usize,
        matches: Vec<PathBuf>,
    },

    #[error("Path escapes the vault: {0}")]
    SecurityViolation(PathBuf),

    #[error("Refusing to modify reserved path: {0}")]
    ReservedPath(PathBuf),

    #[error("Invalid edit in {path}: {message}")]
    InvalidEdit { path: PathBuf, message: String },

    #[error("Cannot read {path}: {reason}")]
    OversizeContent { path: PathBuf, reason: String },

    #[error("Link update incomplete: {updated} notes updated, {} failed ({})", .failed.len(), failed_paths(.failed))]
    PartialFailure {
        updated: usize,
        failed: Vec<(PathBuf, String)>,
    },

    #[error("Invalid frontmatter in {path}: {message}")]
    InvalidFrontmatter { path: PathBuf, message: String },

    #[error("Vault not found at: {0}")]
    VaultNotFound(PathBuf),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("No content provided")]
    NoContentProvided,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("{0}")]
    Other(String),
}

impl VaultError {
    /// Returns the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            VaultError::NoteNotFound(_) => exit_code::NOTE_NOT_FOUND,
            VaultError::NoteAlreadyExists(_) => exit_code::NOTE_ALREADY_EXISTS,
            VaultError::AmbiguousResolution { .. } => exit_code::AMBIGUOUS_RESOLUTION,
            VaultError::InvalidFrontmatter { .. } => exit_code::INVALID_FRONTMATTER,
            VaultError::SecurityViolation(_) => exit_code::SECURITY_VIOLATION,
            VaultError::ReservedPath(_) => exit_code::RESERVED_PATH,
            VaultError::InvalidEdit { .. } => exit_code::INVALID_EDIT,
            VaultError::OversizeContent { .. } => exit_code::OVERSIZE_CONTENT,
            VaultError::PartialFailure { .. } => exit_code::PARTIAL_FAILURE,
            _ => exit_code::GENERAL_ERROR,
        }
    }
}

fn failed_paths(failed: &[(PathBuf, String)]) -> String {
    failed
        .iter()
        .map(|(path, _)| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            VaultError::NoteNotFound(PathBuf::from("x.md")).exit_code(),
            exit_code::NOTE_NOT_FOUND
        );
        assert_eq!(
            VaultError::SecurityViolation(PathBuf::from("link.md")).exit_code(),
            exit_code::SECURITY_VIOLATION
        );
        assert_eq!(
            VaultError::Other("boom".to_string()).exit_code(),
            exit_code::GENERAL_ERROR
        );
    }

    #[test]
    fn test_partial_failure_message_lists_paths() {
        let err = VaultError::PartialFailure {
            updated: 2,
            failed: vec![(PathBuf::from("a.md"), "permission denied".to_string())],
        };
        let msg = err.to_string();
        assert!(msg.contains("2 notes updated"));
        assert!(msg.contains("1 failed"));
        assert!(msg.contains("a.md"));
    }
}
