use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("generator length must be at least 1")]
    InvalidGeneratorLength,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct FileConfig {
    pub data_dir: Option<String>,
    pub clipboard_ttl: Option<u64>,
    pub backups: Option<usize>,
    pub generator_length: Option<u16>,
    pub log_level: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub clipboard_ttl: Option<u64>,
    pub backups: Option<usize>,
    pub generator_length: Option<u16>,
    pub log_level: Option<String>,
}

impl Config {
    pub fn create(data_dir: Option<PathBuf>) -> Result<Self, ConfigError> {
        // 1) Load config file if present
        let (_, file_cfg) = load_file_config_with_path();

        // 2) Data directory: CLI > env > config file > platform default
        let data_dir = data_dir
            .or_else(|| env::var("PASSKEEP_DATA_DIR").ok().map(PathBuf::from))
            .or_else(|| file_cfg.data_dir.as_ref().map(PathBuf::from))
            .unwrap_or_else(default_data_dir);

        // 3) Everything else: env > config file > None (callers apply their defaults)
        let clipboard_ttl = env::var("PASSKEEP_CLIP_TTL")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .or(file_cfg.clipboard_ttl);
        let backups = env::var("PASSKEEP_BACKUPS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .or(file_cfg.backups);
        let generator_length = env::var("PASSKEEP_GEN_LENGTH")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .or(file_cfg.generator_length);
        if generator_length == Some(0) {
            return Err(ConfigError::InvalidGeneratorLength);
        }
        let log_level = env::var("PASSKEEP_LOG").ok().or(file_cfg.log_level);

        Ok(Config {
            data_dir,
            clipboard_ttl,
            backups,
            generator_length,
            log_level,
        })
    }

    pub fn log_directive(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

pub fn load_file_config_with_path() -> (PathBuf, FileConfig) {
    // Allow tests/users to override config dir via PASSKEEP_CONFIG_DIR; else use platform default
    let cfg_dir = if let Ok(p) = env::var("PASSKEEP_CONFIG_DIR") {
        PathBuf::from(p)
    } else {
        dirs::config_dir().unwrap_or_else(|| PathBuf::from("."))
    };
    let path = cfg_dir.join("passkeep").join("config.toml");
    let cfg = match std::fs::read_to_string(&path) {
        Ok(s) => toml::from_str::<FileConfig>(&s).unwrap_or_default(),
        Err(_) => FileConfig::default(),
    };
    (path, cfg)
}

fn default_data_dir() -> PathBuf {
    if let Some(mut p) = dirs::data_dir() {
        p.push("passkeep");
        return p;
    }
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(&home).join(".passkeep")
}
