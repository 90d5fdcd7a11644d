//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notevault")]
#[command(author, version, about = "Safe access to Obsidian-style note vaults", long_about = None)]
pub struct Cli {
    /// Path to the vault (overrides NOTEVAULT_PATH and the config file)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Output as JSON (default)
    #[arg(long, global = true, conflicts_with_all = ["yaml", "toml"])]
    pub json: bool,

    /// Output as YAML
    #[arg(long, global = true, conflicts_with_all = ["json", "toml"])]
    pub yaml: bool,

    /// Output as TOML
    #[arg(long, global = true, conflicts_with_all = ["json", "yaml"])]
    pub toml: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.yaml {
            OutputFormat::Yaml
        } else if self.toml {
            OutputFormat::Toml
        } else {
            OutputFormat::Json
        }
    }

    /// Default log filter for the `-v` count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show vault statistics and configuration
    Info,

    /// List a folder's notes, files and subfolders
    List(ListArgs),

    /// Resolve a note reference to a vault path
    Resolve(ResolveArgs),

    /// Print a note
    Read(ReadArgs),

    /// Write a note, replacing any existing content
    Write(WriteArgs),

    /// Create a new note; fails if it exists
    Create(WriteArgs),

    /// Apply literal find/replace edits to a note
    Edit(EditArgs),

    /// Append content to a note, optionally under a heading
    Append(AppendArgs),

    /// Delete a note (to .trash/ when available)
    Delete(NoteArgs),

    /// Restore a note from .trash/
    Restore(RestoreArgs),

    /// Move or rename a note and update links to it
    Move(MoveArgs),

    /// Notes linking to a note
    Backlinks(NoteArgs),

    /// Links from a note and whether they resolve
    Links(NoteArgs),

    /// Get note frontmatter
    #[command(name = "get-frontmatter")]
    GetFrontmatter(GetFrontmatterArgs),

    /// Set or remove frontmatter keys
    #[command(name = "set-frontmatter")]
    SetFrontmatter(SetFrontmatterArgs),

    /// Full-text search
    Search(SearchArgs),

    /// Find notes by tag
    #[command(name = "search-tag")]
    SearchTag(SearchTagArgs),

    /// Locate (and optionally create) a daily note
    Daily(DailyArgs),

    /// Append to a daily note
    #[command(name = "daily-append")]
    DailyAppend(DailyAppendArgs),

    /// List templates
    Templates,

    /// Create a note from a template
    #[command(name = "from-template")]
    FromTemplate(FromTemplateArgs),
}

#[derive(Args, Debug)]
pub struct NoteArgs {
    /// Note path or name
    pub note: String,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Folder relative to the vault root
    #[arg(default_value = "")]
    pub folder: String,

    /// Descend into subfolders
    #[arg(short, long)]
    pub recursive: bool,

    /// Maximum depth when recursive
    #[arg(long, default_value_t = 5)]
    pub max_depth: usize,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Note path or name
    pub note: String,
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Note path or name
    pub note: String,

    /// Print only the note text instead of a structured record
    #[arg(long)]
    pub raw: bool,
}

/// Content source shared by write-style commands.
#[derive(Args, Debug)]
pub struct ContentArgs {
    /// Content as a string (`\n` is unescaped)
    #[arg(long, conflicts_with = "file")]
    pub content: Option<String>,

    /// Read content from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Vault-relative path
    pub path: String,

    #[command(flatten)]
    pub input: ContentArgs,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Note path or name
    pub note: String,

    /// Text to replace (pairs with --new)
    #[arg(long = "old", requires = "new")]
    pub old: Vec<String>,

    /// Replacement text (pairs with --old)
    #[arg(long = "new", requires = "old")]
    pub new: Vec<String>,

    /// JSON array of {"old": ..., "new": ...} edits
    #[arg(long, conflicts_with_all = ["old", "new"])]
    pub edits: Option<String>,

    /// Show the diff without writing
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct AppendArgs {
    /// Note path or name
    pub note: String,

    #[command(flatten)]
    pub input: ContentArgs,

    /// Append at the end of this heading's section
    #[arg(long)]
    pub heading: Option<String>,

    /// Create the note if it does not exist
    #[arg(long)]
    pub create: bool,
}

#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Path inside .trash/
    pub trashed: String,

    /// Restore to this path instead of the original location
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Note to move
    pub from: String,

    /// New vault-relative path
    pub to: String,
}

#[derive(Args, Debug)]
pub struct GetFrontmatterArgs {
    /// Note path or name
    pub note: String,

    /// Only print this key
    #[arg(short, long)]
    pub key: Option<String>,
}

#[derive(Args, Debug)]
pub struct SetFrontmatterArgs {
    /// Note path or name
    pub note: String,

    /// JSON object of keys to set
    #[arg(long)]
    pub set: Option<String>,

    /// Single key=value pair (value parsed as YAML)
    #[arg(short, long = "key-value", value_name = "KEY=VALUE")]
    pub key_value: Vec<String>,

    /// Keys to remove
    #[arg(long)]
    pub remove: Vec<String>,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text to look for
    pub query: String,

    /// Restrict to a folder
    #[arg(long, default_value = "")]
    pub folder: String,

    /// Maximum number of notes
    #[arg(short = 'n', long, default_value_t = 20)]
    pub max_results: usize,
}

#[derive(Args, Debug)]
pub struct SearchTagArgs {
    /// Tag, with or without `#`
    pub tag: String,
}

/// Which day a daily-note command targets.
#[derive(Args, Debug)]
pub struct DayArgs {
    /// Day offset from today (-1 is yesterday)
    #[arg(long, allow_hyphen_values = true, default_value_t = 0, conflicts_with = "date")]
    pub offset: i64,

    /// Explicit date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args, Debug)]
pub struct DailyArgs {
    #[command(flatten)]
    pub day: DayArgs,

    /// Create the note from the daily template if missing
    #[arg(long)]
    pub create: bool,
}

#[derive(Args, Debug)]
pub struct DailyAppendArgs {
    #[command(flatten)]
    pub day: DayArgs,

    #[command(flatten)]
    pub input: ContentArgs,

    /// Append at the end of this heading's section
    #[arg(long)]
    pub heading: Option<String>,

    /// Fail instead of creating a missing daily note
    #[arg(long)]
    pub no_create: bool,
}

#[derive(Args, Debug)]
pub struct FromTemplateArgs {
    /// Template name or path
    pub template: String,

    /// Vault-relative path of the new note
    pub path: String,

    /// Template variable as key=value (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_output_format_and_log_level() {
        let cli = Cli::parse_from(["notevault", "--yaml", "-vv", "info"]);
        assert_eq!(cli.output_format(), OutputFormat::Yaml);
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn test_edit_pairs() {
        let cli = Cli::parse_from([
            "notevault", "edit", "Note", "--old", "a", "--new", "b", "--old", "c", "--new", "d",
        ]);
        let Commands::Edit(args) = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(args.old, vec!["a", "c"]);
        assert_eq!(args.new, vec!["b", "d"]);
    }

    #[test]
    fn test_negative_offset() {
        let cli = Cli::parse_from(["notevault", "daily", "--offset", "-1"]);
        let Commands::Daily(args) = cli.command else {
            panic!("expected daily");
        };
        assert_eq!(args.day.offset, -1);
    }
}
