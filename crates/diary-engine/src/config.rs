//! # Engine Configuration
//!
//! Where the diary keeps its database and how reports run.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     DIARY_DB_PATH=/data/diary.db                                       │
//! │     DIARY_DB_MAX_CONNECTIONS=4                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/mobilediary/engine.toml (Linux)                          │
//! │     ~/Library/Application Support/com.mobile.diary/engine.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     diary.db in the platform data dir, 5 connections                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # engine.toml
//! [database]
//! path = "/home/me/diary/diary.db"
//! max_connections = 5
//!
//! [reports]
//! spawn_reports = true  # run report sessions on their own task
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use diary_db::DbConfig;

// =============================================================================
// Sections
// =============================================================================

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. `:memory:` gives a private in-memory store.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> PathBuf {
    directories::ProjectDirs::from("com", "mobile", "diary")
        .map(|dirs| dirs.data_dir().join("diary.db"))
        .unwrap_or_else(|| PathBuf::from("diary.db"))
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// `[reports]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Run report sessions on a spawned task instead of the caller's.
    #[serde(default = "default_true")]
    pub spawn_reports: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            spawn_reports: true,
        }
    }
}

// =============================================================================
// Engine Configuration
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub reports: ReportSettings,
}

impl EngineConfig {
    /// Configuration for tests: private in-memory store, reports inline.
    pub fn in_memory() -> Self {
        EngineConfig {
            database: DatabaseSettings {
                path: PathBuf::from(":memory:"),
                max_connections: 1,
            },
            reports: ReportSettings {
                spawn_reports: false,
            },
        }
    }

    /// Loads configuration: defaults, then file, then environment.
    ///
    /// A missing file is not an error. A file that does not parse is.
    pub fn load(config_path: Option<PathBuf>) -> EngineResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading engine config from file");
                let contents = std::fs::read_to_string(&path).map_err(|e| {
                    EngineError::validation(format!("Cannot read {}: {}", path.display(), e))
                })?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Like [`load`](Self::load) but falls back to defaults on any error.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn from_toml(contents: &str) -> EngineResult<Self> {
        toml::from_str(contents)
            .map_err(|e| EngineError::validation(format!("Invalid engine config: {}", e)))
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(EngineError::validation("database.path must not be empty"));
        }

        if self.database.max_connections == 0 {
            return Err(EngineError::validation(
                "database.max_connections must be greater than 0",
            ));
        }

        if self.is_in_memory() && self.database.max_connections != 1 {
            return Err(EngineError::validation(
                "an in-memory database needs max_connections = 1",
            ));
        }

        Ok(())
    }

    pub fn is_in_memory(&self) -> bool {
        self.database.path.as_os_str() == ":memory:"
    }

    /// Pool settings for [`diary_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        if self.is_in_memory() {
            return DbConfig::in_memory();
        }
        DbConfig::new(&self.database.path).max_connections(self.database.max_connections)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `DIARY_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("DIARY_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(max) = lookup("DIARY_DB_MAX_CONNECTIONS") {
            match max.parse::<u32>() {
                Ok(n) => self.database.max_connections = n,
                Err(_) => warn!(value = %max, "Ignoring invalid DIARY_DB_MAX_CONNECTIONS"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "mobile", "diary")
            .map(|dirs| dirs.config_dir().join("engine.toml"))
    }
}
