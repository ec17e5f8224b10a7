// src/config/app.rs
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;
use tracing::{debug, warn};

use super::defaults::{CONFIG_DIR_NAME, CONFIG_ENV_VAR, CONFIG_FILE_NAME, KEEP_PLAIN_ENV_VAR};
use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineSettings,
    pub batch: BatchSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Chunk size for streaming reads; does not affect the container format
    pub stream_buffer_size: usize,
    /// Default for callers that do not pass `keep_plain_file` explicitly
    pub keep_plain_file: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    pub extension: String,
    pub recursive: bool,
    pub follow_links: bool,
}

impl Config {
    fn validate(self) -> Result<Self> {
        if self.engine.stream_buffer_size == 0 {
            return Err(CoreError::Config(
                "engine.stream_buffer_size must be at least 1".into(),
            ));
        }
        if !self.batch.extension.starts_with('.') || self.batch.extension.len() < 2 {
            return Err(CoreError::Config(format!(
                "batch.extension must look like \".ext\", got {:?}",
                self.batch.extension
            )));
        }
        Ok(self)
    }

    fn apply_env_overrides(mut self) -> Self {
        if let Ok(value) = std::env::var(KEEP_PLAIN_ENV_VAR) {
            self.engine.keep_plain_file = matches!(value.as_str(), "1" | "true" | "yes");
        }
        self
    }
}

/// Parse and validate a TOML config file
pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| CoreError::Config(format!("cannot read {}: {e}", path.display())))?;
    let conf: Config = toml::from_str(&content)
        .map_err(|e| CoreError::Config(format!("invalid TOML in {}: {e}", path.display())))?;
    conf.validate()
}

fn config_path() -> Option<PathBuf> {
    match std::env::var(CONFIG_ENV_VAR) {
        Ok(path) => Some(PathBuf::from(path)),
        Err(_) => dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)),
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load config once per process — falls back to defaults if missing or invalid
pub fn load() -> &'static Config {
    CONFIG.get_or_init(|| {
        let conf = match config_path() {
            Some(path) if path.exists() => match load_from(&path) {
                Ok(conf) => {
                    debug!(path = %path.display(), "loaded config");
                    conf
                }
                Err(e) => {
                    warn!("{e} — using built-in defaults");
                    Config::default()
                }
            },
            _ => {
                debug!("no config file found — using built-in defaults");
                Config::default()
            }
        };

        conf.apply_env_overrides()
    })
}
