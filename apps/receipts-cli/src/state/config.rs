//! # Application Configuration
//!
//! Settings of the front end itself. Business settings (name, number,
//! signature) are NOT here; they live in the store.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     RECEIPTS_DB_PATH=/data/receipts.db                                 │
//! │     RECEIPTS_OUTPUT_DIR=~/Documents/receipts                           │
//! │     RECEIPTS_CURRENCY_SYMBOL=$                                         │
//! │     RECEIPTS_PDF_COMMAND="wkhtmltopdf --quiet"                         │
//! │                                                                         │
//! │  2. TOML Config File (--config, or the platform config dir)            │
//! │     ~/.config/receipts/config.toml (Linux)                             │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! database_path = "/home/dana/receipts.db"
//! output_dir = "/home/dana/Documents/receipts"
//! currency_symbol = "₪"
//! pdf_command = "wkhtmltopdf --quiet"
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{CliError, CliResult};

const DEFAULT_CURRENCY_SYMBOL: &str = "₪";
const DEFAULT_PDF_COMMAND: &str = "wkhtmltopdf";
const DATABASE_FILE: &str = "receipts.db";
const CONFIG_FILE: &str = "config.toml";

/// Front-end configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite store file. `None` means the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Where print documents, PDFs and backups are written.
    pub output_dir: PathBuf,

    /// Shown after every amount on printed receipts.
    pub currency_symbol: String,

    /// External HTML to PDF converter, invoked as
    /// `<command> [args...] <input.html> <output.pdf>`.
    pub pdf_command: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: None,
            output_dir: PathBuf::from("."),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            pdf_command: DEFAULT_PDF_COMMAND.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration: defaults, then the config file, then the
    /// environment. The result is validated.
    ///
    /// An explicitly given `config_path` must exist; the default path is
    /// optional.
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        let mut config = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(&path)?
            }
            None => match Self::default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    debug!("No config file, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> CliResult<Self> {
        info!(path = %path.display(), "Loading config from file");
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| {
            CliError::config(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    /// Applies `RECEIPTS_*` environment variables.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("RECEIPTS_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(dir) = lookup("RECEIPTS_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }

        if let Some(symbol) = lookup("RECEIPTS_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(command) = lookup("RECEIPTS_PDF_COMMAND") {
            debug!(command = %command, "Overriding PDF command from environment");
            self.pdf_command = command;
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CliResult<()> {
        if self.pdf_command.trim().is_empty() {
            return Err(CliError::config("pdf_command must not be empty"));
        }

        if self.currency_symbol.trim().is_empty() {
            return Err(CliError::config("currency_symbol must not be empty"));
        }

        Ok(())
    }

    /// The store file, creating the platform data directory when needed.
    ///
    /// ## Platform-Specific Paths
    /// - **Linux**: `~/.local/share/receipts/receipts.db`
    /// - **macOS**: `~/Library/Application Support/com.receiptly.receipts/receipts.db`
    /// - **Windows**: `%APPDATA%\receiptly\receipts\data\receipts.db`
    pub fn resolve_database_path(&self) -> CliResult<PathBuf> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let dirs = project_dirs()
            .ok_or_else(|| CliError::config("Could not determine app data directory"))?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join(DATABASE_FILE))
    }

    /// `<output_dir>/<file_name>`, creating the directory when needed.
    pub fn output_path(&self, file_name: &str) -> CliResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(self.output_dir.join(file_name))
    }

    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "receiptly", "receipts")
}

// =============================================================================
// Unit Tests
// =============================================================================
