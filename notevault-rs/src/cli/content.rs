//! Content commands implementation.

use crate::cli::args::{AppendArgs, ContentArgs, EditArgs, ReadArgs, WriteArgs};
use crate::cli::output::{ModifyResponse, Output};
use crate::error::{Result, VaultError};
use crate::store::{NoteStore, TextEdit};
use std::io::{self, Read};

/// Read content from args (--content, --file, or stdin).
pub fn read_input_content(input: &ContentArgs) -> Result<String> {
    if let Some(ref content) = input.content {
        // Unescape newlines
        Ok(content.replace("\\n", "\n"))
    } else if let Some(ref path) = input.file {
        Ok(std::fs::read_to_string(path)?)
    } else if stdin_is_piped() {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Err(VaultError::NoContentProvided)
    }
}

// True when stdin is a pipe or file rather than a terminal.
fn stdin_is_piped() -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::io::AsRawFd;
        unsafe { libc::isatty(io::stdin().as_raw_fd()) == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}

// === read ===

pub fn read(store: &NoteStore, args: &ReadArgs, output: &Output) -> Result<()> {
    let note = store.read(&args.note)?;
    if args.raw {
        output.print_raw(&note.content);
        Ok(())
    } else {
        output.print(&note)
    }
}

// === write / create ===

pub fn write(store: &NoteStore, args: &WriteArgs, output: &Output) -> Result<()> {
    let content = read_input_content(&args.input)?;
    let path = store.write(&args.path, &content)?;
    output.print(&ModifyResponse {
        path: path.to_string(),
        message: "Note written".to_string(),
    })
}

pub fn create(store: &NoteStore, args: &WriteArgs, output: &Output) -> Result<()> {
    // Creating an empty note is fine; only a piped or explicit body is read.
    let content = match read_input_content(&args.input) {
        Ok(content) => content,
        Err(VaultError::NoContentProvided) => String::new(),
        Err(e) => return Err(e),
    };
    let path = store.create(&args.path, &content)?;
    output.print(&ModifyResponse {
        path: path.to_string(),
        message: "Note created".to_string(),
    })
}

// === edit ===

fn collect_edits(args: &EditArgs) -> Result<Vec<TextEdit>> {
    if let Some(ref json) = args.edits {
        return Ok(serde_json::from_str(json)?);
    }
    if args.old.len() != args.new.len() {
        return Err(VaultError::Other(
            "each --old needs a matching --new".to_string(),
        ));
    }
    Ok(args
        .old
        .iter()
        .zip(&args.new)
        .map(|(old, new)| TextEdit::new(old.replace("\\n", "\n"), new.replace("\\n", "\n")))
        .collect())
}

pub fn edit(store: &NoteStore, args: &EditArgs, output: &Output) -> Result<()> {
    let edits = collect_edits(args)?;
    if edits.is_empty() {
        return Err(VaultError::Other(
            "no edits given: use --old/--new or --edits".to_string(),
        ));
    }

    let outcome = store.edit(&args.note, &edits, args.dry_run)?;
    if args.dry_run {
        output.info("Dry run: no changes written");
    }
    output.print(&outcome)
}

// === append ===

pub fn append(store: &NoteStore, args: &AppendArgs, output: &Output) -> Result<()> {
    let content = read_input_content(&args.input)?;
    let path = store.append(&args.note, &content, args.heading.as_deref(), args.create)?;
    output.print(&ModifyResponse {
        path: path.to_string(),
        message: match args.heading {
            Some(ref heading) => format!("Appended under '{}'", heading),
            None => "Appended".to_string(),
        },
    })
}
