//! Link relationships between notes.

mod link_graph;
mod rename;

pub use link_graph::{Backlink, LinkGraph, LinkStatus, OutgoingLink};
pub use rename::{FailedNote, RenameReport, UpdatedNote};
