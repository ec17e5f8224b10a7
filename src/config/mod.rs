// src/config/mod.rs
//! Configuration system for fortenc
//!
//! Central, lazy-loaded global config with TOML + env overrides.

pub use app::{load, load_from, BatchSettings, Config, EngineSettings};

mod app;
mod defaults;
