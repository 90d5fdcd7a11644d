//! Delete and restore commands implementation.

use crate::cli::args::{NoteArgs, RestoreArgs};
use crate::cli::output::{ModifyResponse, Output};
use crate::error::Result;
use crate::store::{DeleteOutcome, NoteStore};

pub fn run(store: &NoteStore, args: &NoteArgs, output: &Output) -> Result<()> {
    let outcome = store.delete(&args.note)?;
    if let DeleteOutcome::Removed { ref path } = outcome {
        output.warn(&format!(
            "no .trash/ folder in vault, {} was deleted permanently",
            path.display()
        ));
    }
    output.print(&outcome)
}

pub fn restore(store: &NoteStore, args: &RestoreArgs, output: &Output) -> Result<()> {
    let restored = store.restore(&args.trashed, args.to.as_deref())?;
    output.print(&ModifyResponse {
        path: restored.to_string(),
        message: "Note restored".to_string(),
    })
}
