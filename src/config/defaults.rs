// src/config/defaults.rs
use crate::config::app::{BatchSettings, EngineSettings};
use crate::consts::{ENCRYPTED_FILE_EXTENSION, STREAM_BUFFER_SIZE};

pub const CONFIG_ENV_VAR: &str = "FORTENC_CONFIG";
pub const KEEP_PLAIN_ENV_VAR: &str = "FORTENC_KEEP_PLAIN";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const CONFIG_DIR_NAME: &str = "fortenc";

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            stream_buffer_size: STREAM_BUFFER_SIZE,
            keep_plain_file: false,
        }
    }
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            extension: ENCRYPTED_FILE_EXTENSION.into(),
            recursive: true,
            follow_links: false,
        }
    }
}
