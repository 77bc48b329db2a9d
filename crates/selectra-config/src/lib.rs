//! Shared configuration for selectra tools.
//!
//! TOML file plus `SELECTRA_` environment overrides, merged with figment,
//! and translation to `selectra_core::SelectConfig`. The CLI layers its
//! own flags on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use selectra_core::SelectConfig;

/// Longest accepted debounce interval.
const MAX_DEBOUNCE_MS: u64 = 10_000;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// CLI presentation defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Controller tuning.
    #[serde(default)]
    pub select: SelectSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    /// "table" or "json".
    #[serde(default = "default_output")]
    pub output: String,

    /// "auto", "always" or "never".
    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// Serialized form of [`SelectConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SelectSettings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default)]
    pub defer_keyboard_change: bool,

    #[serde(default = "default_true")]
    pub warn_on_orphan_values: bool,

    #[serde(default = "default_max_logged_query_len")]
    pub max_logged_query_len: usize,
}

impl Default for SelectSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            defer_keyboard_change: false,
            warn_on_orphan_values: true,
            max_logged_query_len: default_max_logged_query_len(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    300
}
fn default_true() -> bool {
    true
}
fn default_max_logged_query_len() -> usize {
    64
}

impl SelectSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ConfigError::Validation {
                field: "select.debounce_ms".into(),
                reason: format!("must be at most {MAX_DEBOUNCE_MS}, got {}", self.debounce_ms),
            });
        }
        if self.max_logged_query_len == 0 {
            return Err(ConfigError::Validation {
                field: "select.max_logged_query_len".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// Build the runtime controller configuration.
    pub fn to_select_config(&self) -> SelectConfig {
        SelectConfig {
            debounce: Duration::from_millis(self.debounce_ms),
            defer_keyboard_change: self.defer_keyboard_change,
            warn_on_orphan_values: self.warn_on_orphan_values,
            max_logged_query_len: self.max_logged_query_len,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("rs", "selectra", "selectra").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("selectra");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, still honoring `SELECTRA_` overrides
/// (`SELECTRA_SELECT__DEBOUNCE_MS=0`). A missing file means defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SELECTRA_").split("__"));

    let config: Config = figment.extract()?;
    config.select.validate()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    cfg.select.validate()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
