//! Integration tests for the notevault CLI using temporary vaults.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Build a vault from (path, content) pairs.
fn vault_with(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    for (path, content) in files {
        let full = temp.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }
    temp
}

/// Run the notevault binary against a vault and return (stdout, stderr, code).
fn run_notevault(vault: &Path, args: &[&str]) -> (String, String, i32) {
    let binary = env!("CARGO_BIN_EXE_notevault");
    let config_home = TempDir::new().unwrap();

    let output = Command::new(binary)
        .env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("NOTEVAULT_PATH")
        .env_remove("RUST_LOG")
        .arg("--vault")
        .arg(vault)
        .args(args)
        .output()
        .expect("Failed to execute notevault");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("stdout is not JSON")
}

fn sample_vault() -> TempDir {
    vault_with(&[
        ("Note A.md", "---\naliases: [Alpha]\ntags: [project]\n---\n# Note A\n\nSee [[Note B]] and [[Missing]].\n"),
        ("Note B.md", "Back to [[note a]].\n\nAlso [[Alpha|the alias]].\n"),
        ("Folder/Note C.md", "Links to [[Note A#Note A]].\n"),
        ("x/Dup.md", "one"),
        ("y/Dup.md", "two"),
    ])
}

mod resolve_command {
    use super::*;

    #[test]
    fn resolve_by_name() {
        let vault = sample_vault();
        let (stdout, _, code) = run_notevault(vault.path(), &["resolve", "Note C"]);
        assert_eq!(code, 0);
        assert_eq!(json(&stdout)["path"], "Folder/Note C.md");
    }

    #[test]
    fn resolve_not_found() {
        let vault = sample_vault();
        let (_, stderr, code) = run_notevault(vault.path(), &["resolve", "Nope"]);
        assert_eq!(code, 2);
        assert!(stderr.contains("Error:"));
    }

    #[test]
    fn resolve_ambiguous() {
        let vault = sample_vault();
        let (_, stderr, code) = run_notevault(vault.path(), &["resolve", "Dup"]);
        assert_eq!(code, 4);
        assert!(stderr.contains("Ambiguous"));
    }

    #[test]
    fn resolve_escape_is_security_violation() {
        let vault = sample_vault();
        let (_, _, code) = run_notevault(vault.path(), &["write", "../outside", "--content", "x"]);
        assert_eq!(code, 6);
    }

    #[test]
    fn missing_vault() {
        let temp = TempDir::new().unwrap();
        let (_, _, code) = run_notevault(&temp.path().join("absent"), &["info"]);
        assert_ne!(code, 0);
    }
}

mod content_commands {
    use super::*;

    #[test]
    fn read_note() {
        let vault = sample_vault();
        let (stdout, _, code) = run_notevault(vault.path(), &["read", "Note A"]);
        assert_eq!(code, 0);
        let value = json(&stdout);
        assert_eq!(value["path"], "Note A.md");
        assert_eq!(value["frontmatter"]["tags"][0], "project");
        assert!(value["body"].as_str().unwrap().starts_with("# Note A"));
    }

    #[test]
    fn read_raw() {
        let vault = sample_vault();
        let (stdout, _, code) = run_notevault(vault.path(), &["read", "Note B", "--raw"]);
        assert_eq!(code, 0);
        assert!(stdout.starts_with("Back to [[note a]]."));
    }

    #[test]
    fn create_then_create_again() {
        let vault = sample_vault();
        let (_, _, code) = run_notevault(vault.path(), &["create", "New/Idea", "--content", "hello"]);
        assert_eq!(code, 0);
        assert_eq!(fs::read_to_string(vault.path().join("New/Idea.md")).unwrap(), "hello");

        let (_, _, code) = run_notevault(vault.path(), &["create", "New/Idea", "--content", "again"]);
        assert_eq!(code, 3);
    }

    #[test]
    fn write_to_config_dir_is_reserved() {
        let vault = sample_vault();
        let (_, _, code) = run_notevault(vault.path(), &["write", ".obsidian/x", "--content", "x"]);
        assert_eq!(code, 7);
    }

    #[test]
    fn edit_requires_unique_match() {
        let vault = vault_with(&[("n.md", "a a b\n")]);

        let (_, _, code) = run_notevault(vault.path(), &["edit", "n", "--old", "a", "--new", "c"]);
        assert_eq!(code, 8);

        let (stdout, _, code) = run_notevault(vault.path(), &["edit", "n", "--old", "b", "--new", "c"]);
        assert_eq!(code, 0);
        assert_eq!(json(&stdout)["applied"], true);
        assert_eq!(fs::read_to_string(vault.path().join("n.md")).unwrap(), "a a c\n");
    }

    #[test]
    fn edit_dry_run_leaves_file() {
        let vault = vault_with(&[("n.md", "hello world\n")]);
        let (stdout, _, code) = run_notevault(
            vault.path(),
            &["edit", "n", "--old", "world", "--new", "there", "--dry-run"],
        );
        assert_eq!(code, 0);
        let value = json(&stdout);
        assert_eq!(value["applied"], false);
        assert!(value["diff"].as_str().unwrap().contains("+hello there"));
        assert_eq!(fs::read_to_string(vault.path().join("n.md")).unwrap(), "hello world\n");
    }

    #[test]
    fn append_under_heading() {
        let vault = vault_with(&[("n.md", "# Log\n- one\n\n# Other\ntext\n")]);
        let (_, _, code) = run_notevault(
            vault.path(),
            &["append", "n", "--heading", "Log", "--content", "- two"],
        );
        assert_eq!(code, 0);
        assert_eq!(
            fs::read_to_string(vault.path().join("n.md")).unwrap(),
            "# Log\n- one\n- two\n\n# Other\ntext\n"
        );
    }
}

mod link_commands {
    use super::*;

    #[test]
    fn backlinks_include_alias_and_case() {
        let vault = sample_vault();
        let (stdout, _, code) = run_notevault(vault.path(), &["backlinks", "Note A"]);
        assert_eq!(code, 0);
        let value = json(&stdout);
        assert_eq!(value["total"], 3);
        let froms: Vec<&str> = value["backlinks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["from"].as_str().unwrap())
            .collect();
        assert!(froms.contains(&"Note B.md"));
        assert!(froms.contains(&"Folder/Note C.md"));
    }

    #[test]
    fn outgoing_links_report_broken() {
        let vault = sample_vault();
        let (stdout, _, code) = run_notevault(vault.path(), &["links", "Note A"]);
        assert_eq!(code, 0);
        let value = json(&stdout);
        assert_eq!(value["total"], 2);
        assert_eq!(value["broken"], 1);
        assert_eq!(value["links"][0]["status"], "resolved");
        assert_eq!(value["links"][1]["status"], "broken");
    }

    #[test]
    fn move_rewrites_links() {
        let vault = sample_vault();
        let (stdout, _, code) = run_notevault(vault.path(), &["move", "Note B", "Archive/Renamed"]);
        assert_eq!(code, 0);
        assert_eq!(json(&stdout)["to"], "Archive/Renamed.md");
        assert!(vault.path().join("Archive/Renamed.md").exists());

        let note_a = fs::read_to_string(vault.path().join("Note A.md")).unwrap();
        assert!(note_a.contains("See [[Renamed]] and [[Missing]]."));
    }
}

mod frontmatter_commands {
    use super::*;

    #[test]
    fn get_single_key() {
        let vault = sample_vault();
        let (stdout, _, code) =
            run_notevault(vault.path(), &["get-frontmatter", "Note A", "--key", "aliases"]);
        assert_eq!(code, 0);
        assert_eq!(json(&stdout)["aliases"][0], "Alpha");
    }

    #[test]
    fn set_and_remove() {
        let vault = sample_vault();
        let (stdout, _, code) = run_notevault(
            vault.path(),
            &["set-frontmatter", "Note A", "--set", r#"{"status": "done"}"#, "--remove", "tags"],
        );
        assert_eq!(code, 0);
        let value = json(&stdout);
        assert_eq!(value["frontmatter"]["status"], "done");
        assert!(value["frontmatter"].get("tags").is_none());

        let content = fs::read_to_string(vault.path().join("Note A.md")).unwrap();
        assert!(content.contains("status: done"));
        assert!(content.ends_with("See [[Note B]] and [[Missing]].\n"));
    }

    #[test]
    fn invalid_frontmatter_exit_code() {
        let vault = vault_with(&[("bad.md", "---\nkey: [unclosed\n---\nbody\n")]);
        let (_, _, code) = run_notevault(vault.path(), &["get-frontmatter", "bad"]);
        assert_eq!(code, 5);
    }
}

mod vault_commands {
    use super::*;

    #[test]
    fn delete_and_restore_with_trash() {
        let vault = sample_vault();
        fs::create_dir(vault.path().join(".trash")).unwrap();

        let (stdout, _, code) = run_notevault(vault.path(), &["delete", "Note C"]);
        assert_eq!(code, 0);
        assert_eq!(json(&stdout)["outcome"], "trashed");
        assert!(vault.path().join(".trash/Folder/Note C.md").exists());

        let (_, _, code) = run_notevault(vault.path(), &["restore", ".trash/Folder/Note C.md"]);
        assert_eq!(code, 0);
        assert!(vault.path().join("Folder/Note C.md").exists());
    }

    #[test]
    fn delete_without_trash_is_permanent() {
        let vault = sample_vault();
        let (stdout, stderr, code) = run_notevault(vault.path(), &["delete", "Note C"]);
        assert_eq!(code, 0);
        assert_eq!(json(&stdout)["outcome"], "removed");
        assert!(stderr.contains("Warning"));
        assert!(!vault.path().join("Folder/Note C.md").exists());
    }

    #[test]
    fn list_and_info() {
        let vault = sample_vault();
        let (stdout, _, code) = run_notevault(vault.path(), &["list", "--recursive"]);
        assert_eq!(code, 0);
        assert!(stdout.contains("Folder/Note C.md"));

        let (stdout, _, code) = run_notevault(vault.path(), &["info"]);
        assert_eq!(code, 0);
        assert_eq!(json(&stdout)["note_count"], 5);
    }

    #[test]
    fn yaml_output() {
        let vault = sample_vault();
        let (stdout, _, code) = run_notevault(vault.path(), &["--yaml", "resolve", "Note B"]);
        assert_eq!(code, 0);
        assert!(stdout.contains("path: Note B.md"));
    }

    #[test]
    fn search_and_tags() {
        let vault = sample_vault();
        let (stdout, _, code) = run_notevault(vault.path(), &["search", "back to"]);
        assert_eq!(code, 0);
        assert_eq!(json(&stdout)["results"][0]["path"], "Note B.md");

        let (stdout, _, code) = run_notevault(vault.path(), &["search-tag", "project"]);
        assert_eq!(code, 0);
        assert_eq!(json(&stdout)["total"], 1);
    }
}

mod daily_commands {
    use super::*;

    #[test]
    fn daily_with_config_and_template() {
        let vault = vault_with(&[
            (
                ".obsidian/daily-notes.json",
                r#"{"folder": "Journal", "format": "YYYY/MM/YYYY-MM-DD", "template": "Templates/Day"}"#,
            ),
            ("Templates/Day.md", "# {{date:dddd}}\n\n## Log\n"),
        ]);

        let (stdout, _, code) =
            run_notevault(vault.path(), &["daily", "--date", "2026-02-26", "--create"]);
        assert_eq!(code, 0);
        let value = json(&stdout);
        assert_eq!(value["path"], "Journal/2026/02/2026-02-26.md");
        assert_eq!(value["created"], true);

        let (_, _, code) = run_notevault(
            vault.path(),
            &["daily-append", "--date", "2026-02-26", "--heading", "Log", "--content", "- shipped"],
        );
        assert_eq!(code, 0);
        assert_eq!(
            fs::read_to_string(vault.path().join("Journal/2026/02/2026-02-26.md")).unwrap(),
            "# Thursday\n\n## Log\n- shipped\n"
        );
    }

    #[test]
    fn daily_missing_without_create() {
        let vault = vault_with(&[]);
        let (_, _, code) = run_notevault(vault.path(), &["daily", "--date", "2026-02-26"]);
        assert_eq!(code, 2);
    }

    #[test]
    fn from_template_with_vars() {
        let vault = vault_with(&[("Templates/Meeting.md", "# {{title}} with {{who}}\n")]);
        let (_, _, code) = run_notevault(
            vault.path(),
            &["from-template", "Meeting", "Meetings/Kickoff", "--var", "who=Ada"],
        );
        assert_eq!(code, 0);
        assert_eq!(
            fs::read_to_string(vault.path().join("Meetings/Kickoff.md")).unwrap(),
            "# Kickoff with Ada\n"
        );

        let (stdout, _, code) = run_notevault(vault.path(), &["templates"]);
        assert_eq!(code, 0);
        assert_eq!(json(&stdout)["items"][0]["name"], "Meeting");
    }
}
