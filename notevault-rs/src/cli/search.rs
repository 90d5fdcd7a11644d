//! Search commands implementation.

use crate::cli::args::{SearchArgs, SearchTagArgs};
use crate::cli::output::Output;
use crate::error::Result;
use crate::search::{SearchHit, TagHit, search_by_tag, search_notes};
use crate::store::NoteStore;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Serialize)]
pub struct TagSearchResponse {
    pub tag: String,
    pub total: usize,
    pub results: Vec<TagHit>,
}

pub fn run(store: &NoteStore, args: &SearchArgs, output: &Output) -> Result<()> {
    let results = search_notes(store.vault(), &args.query, &args.folder, args.max_results)?;
    output.print(&SearchResponse {
        query: args.query.clone(),
        total: results.len(),
        results,
    })
}

pub fn by_tag(store: &NoteStore, args: &SearchTagArgs, output: &Output) -> Result<()> {
    let results = search_by_tag(store.vault(), &args.tag)?;
    output.print(&TagSearchResponse {
        tag: args.tag.clone(),
        total: results.len(),
        results,
    })
}
