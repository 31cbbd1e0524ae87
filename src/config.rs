//! Runtime configuration and persisted user settings.
//!
//! [`Config`] is the explicit value handed to the loader. [`Settings`] is an
//! optional JSON file in the user's config directory that supplies defaults
//! for the command-line front end.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "mdframe";
const SETTINGS_FILE: &str = "config.json";

/// Supported metadata file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataFormat {
    #[default]
    Toml,
}

impl MetadataFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            MetadataFormat::Toml => "toml",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(MetadataFormat::Toml),
            _ => None,
        }
    }
}

/// Where the metadata schema comes from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SchemaLocation {
    /// Schema bundled with the crate
    #[default]
    Builtin,
    Path(PathBuf),
}

/// Everything the loader needs to produce records
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub format: MetadataFormat,
    pub schema: SchemaLocation,
    /// Descend into subdirectories of `data_dir`
    pub recursive: bool,
}

impl Config {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            format: MetadataFormat::default(),
            schema: SchemaLocation::default(),
            recursive: false,
        }
    }

    pub fn with_schema(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema = SchemaLocation::Path(path.into());
        self
    }

    pub fn with_format(mut self, format: MetadataFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }
}

/// User settings stored in the config directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema used when `--schema` is not given
    #[serde(default)]
    pub schema_path: Option<PathBuf>,

    /// Descend into subdirectories by default
    #[serde(default)]
    pub recursive: bool,

    /// Colored output
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_color() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_path: None,
            recursive: false,
            color: default_color(),
        }
    }
}

impl Settings {
    /// Load settings from the config directory, or defaults if the file is absent
    pub fn load() -> Result<Self> {
        let path = get_settings_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        Ok(settings)
    }

    /// Save settings to the config directory
    pub fn save(&self) -> Result<()> {
        let path = get_settings_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(&path, content).context("Failed to write settings file")?;
        Ok(())
    }

    /// Fill in the parts of `config` the caller left at their defaults
    pub fn apply(&self, config: &mut Config) {
        if config.schema == SchemaLocation::Builtin {
            if let Some(path) = &self.schema_path {
                config.schema = SchemaLocation::Path(path.clone());
            }
        }
        config.recursive |= self.recursive;
    }
}

/// Path of the settings file
pub fn get_settings_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join(APP_NAME).join(SETTINGS_FILE))
}
