//! Configuration handling for the blog manager
//!
//! Settings come from a TOML file (by default
//! `~/.config/blog-cli/config.toml`) and from command-line flags. Flags win.
//! Everything is resolved once into an immutable [`Config`].

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Editor used when neither flags, the config file nor the environment name one
pub const DEFAULT_EDITOR: &str = "vim";

/// Extension given to new drafts
pub const DEFAULT_EXTENSION: &str = ".md";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("An upload command must be given on the command line or in the config file")]
    MissingUploadConfig,

    #[error("Invalid upload command: {0}")]
    InvalidUploadCommand(String),
}

/// Contents of the configuration file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FileConfig {
    /// Command used to open posts (the file path is appended)
    pub editor: Option<String>,

    /// Directory holding `_drafts/`, `_published/` and `_posts/`
    pub base_dir: Option<PathBuf>,

    /// Extension for new drafts, including the dot
    pub extension: Option<String>,

    /// Upload command; `{site}` is replaced with the staging directory
    pub upload_cmd: Option<String>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub editor: Option<String>,
    pub base_dir: Option<PathBuf>,
    pub extension: Option<String>,
    pub upload_cmd: Option<String>,
}

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub editor: String,
    pub base_dir: PathBuf,
    pub extension: String,
    pub upload_cmd: Option<String>,
}

impl Config {
    /// Loads the config file (if any) and applies `overrides` on top
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let file = match path {
            Some(path) => Self::read_file(path)?,
            None => match Self::default_path() {
                Some(path) => Self::read_file(&path)?,
                None => FileConfig::default(),
            },
        };

        Ok(Self::resolve(file, overrides, Self::editor_from_env()))
    }

    /// Merges file values and overrides, filling in defaults.
    ///
    /// `env_editor` is only consulted when neither source names an editor.
    pub fn resolve(file: FileConfig, overrides: Overrides, env_editor: Option<String>) -> Self {
        let editor = overrides
            .editor
            .or(file.editor)
            .or(env_editor)
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string());

        let base_dir = overrides
            .base_dir
            .or(file.base_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        let extension = overrides
            .extension
            .or(file.extension)
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

        Self {
            editor,
            base_dir: expand_home(&base_dir),
            extension,
            upload_cmd: overrides.upload_cmd.or(file.upload_cmd),
        }
    }

    /// Returns the default config file location
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "blog", "blog-cli").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Reads a config file; a missing file yields the empty config
    pub fn read_file(path: &Path) -> Result<FileConfig> {
        if !path.exists() {
            return Ok(FileConfig::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    fn editor_from_env() -> Option<String> {
        ["VISUAL", "EDITOR"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find(|value| !value.trim().is_empty())
    }

    /// Returns the upload command, or `MissingUploadConfig`
    pub fn require_upload_cmd(&self) -> Result<&str, ConfigError> {
        self.upload_cmd.as_deref().ok_or(ConfigError::MissingUploadConfig)
    }
}

/// Expands a leading `~` to the user's home directory
fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    match BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(rest),
        None => path.to_path_buf(),
    }
}
