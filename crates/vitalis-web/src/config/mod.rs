//! Configuration loading for Vitalis.
//! Reads vitalis.toml from the current directory or the path in VITALIS_CONFIG.
//! Every key has a default, so running without a file is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "vitalis.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "VITALIS_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16    { 5000 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Mandatory predictor artifact.
    #[serde(default = "default_predictor_path")]
    pub predictor_path: PathBuf,
    /// Optional label decoder artifact.
    #[serde(default = "default_label_decoder_path")]
    pub label_decoder_path: PathBuf,
}

fn default_predictor_path()     -> PathBuf { PathBuf::from("models/my_model.json") }
fn default_label_decoder_path() -> PathBuf { PathBuf::from("models/label_encoder.json") }

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            predictor_path: default_predictor_path(),
            label_decoder_path: default_label_decoder_path(),
        }
    }
}


impl Config {
    /// Load configuration.
    /// Checks VITALIS_CONFIG first, then vitalis.toml, then falls back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::resolve(std::env::var(CONFIG_ENV).ok().as_deref(), Path::new(DEFAULT_CONFIG_FILE))
    }

    /// An explicitly named file must exist; the default file is optional.
    pub fn resolve(explicit: Option<&str>, default_file: &Path) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            if !Path::new(path).exists() {
                anyhow::bail!("Config file not found: {} (set by {})", path, CONFIG_ENV);
            }
            return Self::from_file(Path::new(path));
        }

        if default_file.exists() {
            return Self::from_file(default_file);
        }

        info!("No {} found, using built-in defaults", default_file.display());
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }
}
