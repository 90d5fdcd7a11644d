//! Configuration: the notevault settings file and the host application's
//! read-only `.obsidian/*.json` files.

use crate::error::{Result, VaultError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the default vault.
pub const VAULT_PATH_ENV: &str = "NOTEVAULT_PATH";

/// Host configuration directory inside every vault.
pub const HOST_CONFIG_DIR: &str = ".obsidian";

/// Default byte limit for reading a note.
pub const DEFAULT_MAX_READ_BYTES: u64 = 1_000_000;

/// What `delete` does when the vault has no trash directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrashPolicy {
    /// Remove the file for good when `.trash/` does not exist.
    #[default]
    PermanentWhenMissing,
    /// Create `.trash/` on first delete and always move notes into it.
    CreateTrash,
}

/// Settings from `~/.config/notevault/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Vault used when neither `--vault` nor the environment names one.
    pub vault: Option<PathBuf>,
    pub trash_policy: TrashPolicy,
    pub max_read_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            vault: None,
            trash_policy: TrashPolicy::default(),
            max_read_bytes: DEFAULT_MAX_READ_BYTES,
        }
    }
}

impl AppConfig {
    /// Location of the config file, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("notevault").join("config.toml"))
    }

    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&text)?;
        Ok(config)
    }

    /// Pick the vault path: CLI flag, then environment, then config file.
    pub fn resolve_vault_path(&self, cli_vault: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = cli_vault {
            return Ok(expand_home(path));
        }
        if let Ok(value) = std::env::var(VAULT_PATH_ENV) {
            if !value.trim().is_empty() {
                return Ok(expand_home(Path::new(value.trim())));
            }
        }
        if let Some(ref path) = self.vault {
            return Ok(expand_home(path));
        }
        Err(VaultError::ConfigError(format!(
            "no vault configured: pass --vault, set {} or add `vault = \"...\"` to the config file",
            VAULT_PATH_ENV
        )))
    }
}

/// Expand a leading `~` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

/// Daily notes settings (`daily-notes.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyNotesConfig {
    /// Folder for daily notes, relative to the vault root. Empty = root.
    pub folder: String,
    /// Moment-style date format used for file names.
    pub format: String,
    /// Template note reference. Empty = no template.
    pub template: String,
}

impl Default for DailyNotesConfig {
    fn default() -> Self {
        Self {
            folder: String::new(),
            format: "YYYY-MM-DD".to_string(),
            template: String::new(),
        }
    }
}

/// Core templates plugin settings (`templates.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    pub folder: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            folder: "Templates".to_string(),
        }
    }
}

/// Read-only accessor for the host's config files. Nothing is cached so
/// edits made by the host application show up on the next call.
#[derive(Debug, Clone)]
pub struct HostConfig {
    dir: PathBuf,
}

impl HostConfig {
    pub fn new(vault_root: &Path) -> Self {
        Self {
            dir: vault_root.join(HOST_CONFIG_DIR),
        }
    }

    /// Read and deserialize a JSON file. Missing or unreadable files and
    /// fields fall back to defaults.
    fn read<T: for<'de> Deserialize<'de> + Default>(&self, filename: &str) -> T {
        let path = self.dir.join(filename);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(_) => {
                tracing::debug!(file = filename, "host config missing, using defaults");
                return T::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(file = filename, error = %e, "unparsable host config, using defaults");
                T::default()
            }
        }
    }

    pub fn daily_notes(&self) -> DailyNotesConfig {
        let mut config: DailyNotesConfig = self.read("daily-notes.json");
        if config.format.trim().is_empty() {
            config.format = DailyNotesConfig::default().format;
        }
        config.folder = config.folder.trim_matches('/').to_string();
        config
    }

    pub fn templates(&self) -> TemplatesConfig {
        let mut config: TemplatesConfig = self.read("templates.json");
        config.folder = config.folder.trim_matches('/').to_string();
        if config.folder.is_empty() {
            config.folder = TemplatesConfig::default().folder;
        }
        config
    }

    /// Property type declarations (`types.json`), passed through as-is.
    pub fn property_types(&self) -> serde_json::Map<String, serde_json::Value> {
        let value: serde_json::Value = self.read("types.json");
        match value {
            serde_json::Value::Object(map) => match map.get("types") {
                Some(serde_json::Value::Object(types)) => types.clone(),
                _ => map,
            },
            _ => serde_json::Map::new(),
        }
    }
}
