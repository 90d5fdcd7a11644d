//! Move command with link propagation.

use crate::cli::args::MoveArgs;
use crate::cli::output::Output;
use crate::error::Result;
use crate::store::NoteStore;

/// Move a note. The report is printed even when some links could not be
/// rewritten; the partial failure is then returned for the exit code.
pub fn run(store: &NoteStore, args: &MoveArgs, output: &Output) -> Result<()> {
    let report = store.move_note(&args.from, &args.to)?;
    output.print(&report)?;

    for failed in &report.rename.failed {
        output.warn(&format!(
            "links in {} were not updated: {}",
            failed.path.display(),
            failed.reason
        ));
    }
    report.ensure_complete()
}
