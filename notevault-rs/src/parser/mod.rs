//! Parsers for Obsidian markdown syntax.

pub mod code_block;
pub mod frontmatter;
pub mod heading;
pub mod tag;
pub mod wikilink;

pub use frontmatter::{Frontmatter, split_frontmatter};
pub use heading::{find_heading, parse_headings, section_end};
pub use tag::{parse_tags, tag_matches};
pub use wikilink::{format_wikilink, parse_embeds, parse_links};
