//! Daily note and template commands implementation.

use crate::cli::args::{DailyAppendArgs, DailyArgs, DayArgs, FromTemplateArgs};
use crate::cli::content::read_input_content;
use crate::cli::output::{ListResponse, ModifyResponse, Output};
use crate::daily::{DailyNotes, DailyTarget};
use crate::error::{Result, VaultError};
use crate::store::NoteStore;
use crate::template::{create_from_template, list_templates};
use std::collections::BTreeMap;

fn target(day: &DayArgs) -> Result<DailyTarget> {
    match day.date {
        Some(ref date) => DailyTarget::parse_date(date),
        None => Ok(DailyTarget::Offset(day.offset)),
    }
}

pub fn daily(store: &NoteStore, args: &DailyArgs, output: &Output) -> Result<()> {
    let note = DailyNotes::new(store).locate(target(&args.day)?, args.create)?;
    if note.created {
        output.info(&format!("Created {}", note.path.display()));
    }
    output.print(&note)
}

pub fn daily_append(store: &NoteStore, args: &DailyAppendArgs, output: &Output) -> Result<()> {
    let content = read_input_content(&args.input)?;
    let path = DailyNotes::new(store).append(
        target(&args.day)?,
        &content,
        args.heading.as_deref(),
        !args.no_create,
    )?;
    output.print(&ModifyResponse {
        path: path.to_string(),
        message: "Appended to daily note".to_string(),
    })
}

pub fn templates(store: &NoteStore, output: &Output) -> Result<()> {
    output.print(&ListResponse::from(list_templates(store.vault())?))
}

/// Parse repeated `KEY=VALUE` flags.
fn parse_vars(pairs: &[String]) -> Result<BTreeMap<String, String>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
                .ok_or_else(|| VaultError::Other(format!("expected KEY=VALUE, got '{}'", pair)))
        })
        .collect()
}

pub fn from_template(store: &NoteStore, args: &FromTemplateArgs, output: &Output) -> Result<()> {
    let vars = parse_vars(&args.vars)?;
    let path = create_from_template(store, &args.template, &args.path, &vars)?;
    output.print(&ModifyResponse {
        path: path.to_string(),
        message: format!("Created from template '{}'", args.template),
    })
}
