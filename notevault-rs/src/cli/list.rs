//! List and info commands implementation.

use crate::cli::args::ListArgs;
use crate::cli::output::{ListResponse, Output};
use crate::error::Result;
use crate::store::NoteStore;

pub fn run(store: &NoteStore, args: &ListArgs, output: &Output) -> Result<()> {
    let entries = store.list(&args.folder, args.recursive, args.max_depth)?;
    output.print(&ListResponse::from(entries))
}

pub fn info(store: &NoteStore, output: &Output) -> Result<()> {
    output.print(&store.vault_info()?)
}
