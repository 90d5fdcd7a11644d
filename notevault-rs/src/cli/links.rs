//! Link-related CLI commands.

use crate::cli::args::NoteArgs;
use crate::cli::output::Output;
use crate::error::Result;
use crate::graph::{Backlink, OutgoingLink};
use crate::store::NoteStore;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct BacklinksOutput {
    pub note: String,
    pub total: usize,
    pub backlinks: Vec<Backlink>,
}

#[derive(Debug, Serialize)]
pub struct LinksOutput {
    pub note: String,
    pub total: usize,
    pub broken: usize,
    pub links: Vec<OutgoingLink>,
}

pub fn backlinks(store: &NoteStore, args: &NoteArgs, output: &Output) -> Result<()> {
    let target = store.vault().resolve(&args.note)?;
    let backlinks = store.graph().backlinks(&target)?;
    output.print(&BacklinksOutput {
        note: target.to_string(),
        total: backlinks.len(),
        backlinks,
    })
}

pub fn links(store: &NoteStore, args: &NoteArgs, output: &Output) -> Result<()> {
    let note = store.vault().resolve(&args.note)?;
    let links = store.graph().outgoing_links(&note)?;
    output.print(&LinksOutput {
        note: note.to_string(),
        total: links.len(),
        broken: links.iter().filter(|l| l.is_broken()).count(),
        links,
    })
}
