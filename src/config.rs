use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{Level, info, warn};

use crate::constants;

/// Which persistence backend commands run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Backend {
    /// JSON documents under `storage.data_dir`
    File,
    /// The running agent's HTTP API
    #[default]
    Http,
}

/// User configuration, stored as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiSettings,
    pub storage: StorageSettings,
    pub editor: EditorSettings,
    pub logs: LogSettings,

    /// Max tracing level; `LOG_LEVEL` in the environment wins
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            storage: StorageSettings::default(),
            editor: EditorSettings::default(),
            logs: LogSettings::default(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: constants::api::DEFAULT_BASE_URL.to_string(),
            timeout_ms: constants::api::DEFAULT_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self { data_dir: default_data_dir() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Number of action slots per preset
    pub slot_count: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self { slot_count: constants::macros::DEFAULT_SLOT_COUNT }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Lines kept in the history window
    pub history_limit: usize,

    /// `host:port` of the agent's log stream
    pub address: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            history_limit: constants::logs::HISTORY_LIMIT,
            address: constants::logs::DEFAULT_ADDRESS.to_string(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(constants::config::APP_DIR);
    path.push(constants::config::DATA_DIR);
    path
}

/// Parse a level name; unknown names fall back to `INFO`
pub fn parse_level(name: &str) -> Level {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// `LOG_LEVEL` from the environment, if set and non-blank
pub fn env_level() -> Option<String> {
    env::var("LOG_LEVEL").ok().filter(|level| !level.trim().is_empty())
}

/// An override from the environment wins over the configured level
pub fn resolve_level(env_override: Option<&str>, configured: &str) -> Level {
    parse_level(env_override.unwrap_or(configured))
}

impl Config {
    pub fn path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(constants::config::APP_DIR);
        path.push(constants::config::FILENAME);
        path
    }

    /// Load from the default location, writing a default file on first run
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config
                .save_to(path)
                .context(format!("Failed to write default config to {}", path.display()))?;
            info!(path = %path.display(), "Generated default config file");
            return Ok(config);
        }

        let contents = fs::read_to_string(path)
            .context(format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&contents)
            .context(format!("Failed to parse config file {}", path.display()))?;
        config.validate_and_clamp();
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create config directory: {}", parent.display()))?;
        }
        let contents =
            serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        fs::write(path, contents)
            .context(format!("Failed to write config file to {}", path.display()))?;
        Ok(())
    }

    /// Level for the subscriber: `LOG_LEVEL` if set, else the configured one
    pub fn tracing_level(&self) -> Level {
        resolve_level(env_level().as_deref(), &self.log_level)
    }

    fn validate_and_clamp(&mut self) {
        use constants::validation::*;

        if self.editor.slot_count < MIN_SLOT_COUNT {
            warn!(slot_count = self.editor.slot_count, using = constants::macros::DEFAULT_SLOT_COUNT, "slot_count below minimum, using default");
            self.editor.slot_count = constants::macros::DEFAULT_SLOT_COUNT;
        } else if self.editor.slot_count > MAX_SLOT_COUNT {
            warn!(slot_count = self.editor.slot_count, max = MAX_SLOT_COUNT, "slot_count exceeds maximum, clamping");
            self.editor.slot_count = MAX_SLOT_COUNT;
        }

        if self.logs.history_limit == 0 {
            warn!(using = constants::logs::HISTORY_LIMIT, "history_limit is zero, using default");
            self.logs.history_limit = constants::logs::HISTORY_LIMIT;
        } else if self.logs.history_limit > MAX_HISTORY_LIMIT {
            warn!(history_limit = self.logs.history_limit, max = MAX_HISTORY_LIMIT, "history_limit exceeds maximum, clamping");
            self.logs.history_limit = MAX_HISTORY_LIMIT;
        }

        if self.api.timeout_ms < MIN_TIMEOUT_MS {
            warn!(timeout_ms = self.api.timeout_ms, min = MIN_TIMEOUT_MS, "timeout_ms below minimum, clamping");
            self.api.timeout_ms = MIN_TIMEOUT_MS;
        }
    }
}
