//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`BARBERIA_*`)
//! 2. Config file (`config.toml`)
//! 3. Defaults (this file)
//!
//! ```toml
//! shop_name = "Barbería Don Pepe"
//! currency_symbol = "Gs"
//! salary_week = "monday_to_saturday"
//! cashbox_week = "monday_to_sunday"
//! database_path = "/srv/barberia/barberia.db"
//! backup_dir = "/mnt/usb/backups"
//! backup_on_close = true
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use barberia_core::{Money, WeekDefinition};

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Failures while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Could not determine the app data directory")]
    NoDataDir,
}

/// Application configuration.
///
/// Every field is optional in the TOML file; missing keys keep their
/// default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigState {
    /// Shown in report headers.
    pub shop_name: String,

    /// Symbol used when printing amounts.
    pub currency_symbol: String,

    /// Days that make up a salary period.
    pub salary_week: WeekDefinition,

    /// Days shown together in the cashbox week view.
    pub cashbox_week: WeekDefinition,

    /// SQLite file. Default: `<data dir>/barberia.db`.
    pub database_path: Option<PathBuf>,

    /// Where close-of-day backups go. Default: `<data dir>/backups`.
    pub backup_dir: Option<PathBuf>,

    /// Write a backup after every successful close.
    pub backup_on_close: bool,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            shop_name: "Barbería".to_string(),
            currency_symbol: barberia_core::CURRENCY_SYMBOL.to_string(),
            salary_week: WeekDefinition::SALARY_DEFAULT,
            cashbox_week: WeekDefinition::CASHBOX_DEFAULT,
            database_path: None,
            backup_dir: None,
            backup_on_close: true,
        }
    }
}

impl ConfigState {
    /// Loads defaults, then the TOML file, then `BARBERIA_*` variables.
    ///
    /// `path = None` reads `config.toml` from the platform config directory;
    /// a missing default file is not an error, a missing explicit one is.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => ConfigState::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML file on top of the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Applies environment overrides read through `var`.
    ///
    /// ## Environment Variables
    /// - `BARBERIA_SHOP_NAME`
    /// - `BARBERIA_CURRENCY_SYMBOL`
    /// - `BARBERIA_SALARY_WEEK`, `BARBERIA_CASHBOX_WEEK` (`monday_to_saturday`, `mon-sun`, ...)
    /// - `BARBERIA_DB_PATH`
    /// - `BARBERIA_BACKUP_DIR`
    /// - `BARBERIA_BACKUP_ON_CLOSE` (`true` / `false`)
    pub fn apply_env<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = var("BARBERIA_SHOP_NAME") {
            self.shop_name = name;
        }

        if let Some(symbol) = var("BARBERIA_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(value) = var("BARBERIA_SALARY_WEEK") {
            self.salary_week = parse_week("BARBERIA_SALARY_WEEK", &value)?;
        }

        if let Some(value) = var("BARBERIA_CASHBOX_WEEK") {
            self.cashbox_week = parse_week("BARBERIA_CASHBOX_WEEK", &value)?;
        }

        if let Some(path) = var("BARBERIA_DB_PATH") {
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(path) = var("BARBERIA_BACKUP_DIR") {
            self.backup_dir = Some(PathBuf::from(path));
        }

        if let Some(value) = var("BARBERIA_BACKUP_ON_CLOSE") {
            self.backup_on_close = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "BARBERIA_BACKUP_ON_CLOSE".to_string(),
                value,
            })?;
        }

        Ok(())
    }

    /// Rejects values that would break reports.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shop_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "shop_name".to_string(),
                value: self.shop_name.clone(),
            });
        }
        if self.currency_symbol.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "currency_symbol".to_string(),
                value: self.currency_symbol.clone(),
            });
        }
        debug!(?self, "Config validated");
        Ok(())
    }

    /// The database file to open.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("barberia.db")),
        }
    }

    /// The directory backups are written into.
    pub fn backup_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.backup_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(data_dir()?.join("backups")),
        }
    }

    /// Formats an amount with the configured symbol.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_money(Money::from_gs(150_000)), "Gs 150.000");
    /// ```
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }
}

fn parse_week(key: &str, value: &str) -> Result<WeekDefinition, ConfigError> {
    WeekDefinition::parse(value).ok_or_else(|| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "barberia", "backoffice")
}

/// `<config dir>/config.toml`, when the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Platform data directory, e.g. `~/.local/share/backoffice` on Linux.
fn data_dir() -> Result<PathBuf, ConfigError> {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(ConfigError::NoDataDir)
}
