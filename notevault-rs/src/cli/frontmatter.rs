//! Frontmatter commands implementation.

use crate::cli::args::{GetFrontmatterArgs, SetFrontmatterArgs};
use crate::cli::output::Output;
use crate::error::{Result, VaultError};
use crate::store::NoteStore;
use serde::Serialize;
use serde_yaml::{Mapping, Value as YamlValue};

#[derive(Debug, Serialize)]
pub struct FrontmatterResponse {
    pub path: String,
    pub frontmatter: Mapping,
}

// === get-frontmatter ===

pub fn get_frontmatter(store: &NoteStore, args: &GetFrontmatterArgs, output: &Output) -> Result<()> {
    let path = store.vault().resolve(&args.note)?;
    let fields = store.frontmatter(&args.note)?;

    match args.key {
        Some(ref key) => {
            let value = fields
                .get(key.as_str())
                .ok_or_else(|| VaultError::Other(format!("Key '{}' not found in frontmatter", key)))?;
            let mut single = Mapping::new();
            single.insert(YamlValue::String(key.clone()), value.clone());
            output.print(&single)
        }
        None => output.print(&FrontmatterResponse {
            path: path.to_string(),
            frontmatter: fields,
        }),
    }
}

// === set-frontmatter ===

/// Build the mapping of keys to set from `--set` JSON and `-k key=value` pairs.
fn collect_updates(args: &SetFrontmatterArgs) -> Result<Mapping> {
    let mut updates = match args.set {
        Some(ref json) => match serde_json::from_str::<YamlValue>(json)? {
            YamlValue::Mapping(map) => map,
            _ => {
                return Err(VaultError::Other(
                    "--set expects a JSON object".to_string(),
                ));
            }
        },
        None => Mapping::new(),
    };

    for pair in &args.key_value {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| VaultError::Other(format!("expected KEY=VALUE, got '{}'", pair)))?;
        let value: YamlValue = if value.trim().is_empty() {
            YamlValue::Null
        } else {
            serde_yaml::from_str(value)?
        };
        updates.insert(YamlValue::String(key.trim().to_string()), value);
    }
    Ok(updates)
}

pub fn set_frontmatter(store: &NoteStore, args: &SetFrontmatterArgs, output: &Output) -> Result<()> {
    let updates = collect_updates(args)?;
    if updates.is_empty() && args.remove.is_empty() {
        return Err(VaultError::Other(
            "nothing to change: use --set, -k or --remove".to_string(),
        ));
    }

    let path = store.vault().resolve_for_write(&args.note)?;
    let fields = store.update_frontmatter(&args.note, &updates, &args.remove)?;
    output.print(&FrontmatterResponse {
        path: path.to_string(),
        frontmatter: fields,
    })
}
