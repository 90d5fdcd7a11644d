//! Resolve command implementation.

use crate::cli::args::ResolveArgs;
use crate::cli::output::Output;
use crate::error::Result;
use crate::store::NoteStore;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub query: String,
    pub path: String,
    pub name: String,
}

pub fn run(store: &NoteStore, args: &ResolveArgs, output: &Output) -> Result<()> {
    let resolved = store.vault().resolve(&args.note)?;
    output.print(&ResolveResponse {
        query: args.note.clone(),
        path: resolved.to_string(),
        name: resolved.name().to_string(),
    })
}
