//! Configuration file support.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::export::{DEFAULT_DOWNLOAD_NAME, DEFAULT_EXPORT_FOLDER, ExportOptions, is_single_component};

/// Default database file, relative to the working directory.
pub const DEFAULT_DATABASE: &str = "wordpress.db";

/// Application configuration loaded from config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Content database path
    pub database: Option<PathBuf>,

    /// Root folder inside the archive
    pub export_folder: Option<String>,

    /// Attachment filename offered with the archive
    pub download_name: Option<String>,

    /// Directory for staging trees and archives
    pub temp_dir: Option<PathBuf>,

    /// Apply the paragraph filter to post bodies
    pub autop: Option<bool>,
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config file: {}", config_path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", config_path.display()))
    }

    /// Returns the path to the config file.
    ///
    /// Default: `~/.config/pico-export/config.toml`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pico-export")
            .join("config.toml")
    }

    /// Resolve the content database, with CLI argument taking precedence.
    ///
    /// Precedence order:
    /// 1. CLI `--db` argument
    /// 2. Config file `database` setting
    /// 3. `wordpress.db` in the current directory
    pub fn database(&self, cli_db: Option<&PathBuf>) -> PathBuf {
        cli_db
            .cloned()
            .or_else(|| self.database.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE))
    }

    /// Whether the paragraph filter runs, unless disabled on the command line.
    pub fn autop(&self, cli_no_autop: bool) -> bool {
        !cli_no_autop && self.autop.unwrap_or(true)
    }

    /// Resolve the attachment filename.
    pub fn download_name(&self) -> Result<String> {
        let name = self
            .download_name
            .clone()
            .unwrap_or_else(|| DEFAULT_DOWNLOAD_NAME.to_string());
        validate_name("download_name", &name)?;
        Ok(name)
    }

    /// Builds export options, with the CLI folder taking precedence.
    ///
    /// # Errors
    ///
    /// Fails if the folder or download name is not a single plain path component.
    pub fn export_options(&self, cli_folder: Option<&str>) -> Result<ExportOptions> {
        let folder = cli_folder
            .map(str::to_string)
            .or_else(|| self.export_folder.clone())
            .unwrap_or_else(|| DEFAULT_EXPORT_FOLDER.to_string());
        validate_name("export folder", &folder)?;

        Ok(ExportOptions {
            temp_dir: self.temp_dir.clone().unwrap_or_else(std::env::temp_dir),
            folder,
            download_name: self.download_name()?,
        })
    }
}

fn validate_name(what: &str, name: &str) -> Result<()> {
    if !is_single_component(name) {
        bail!("invalid {}: {:?} (must be a single file name)", what, name);
    }
    Ok(())
}
