use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::store::DEFAULT_TRANSCRIPTS_ROOT;
use crate::ytdlp::DEFAULT_YTDLP;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/transcript-api-env";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Values read from the `KEY="value"` env file. Everything is optional.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub transcripts_root: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub ytdlp_path: Option<PathBuf>,
    pub ytdlp_cookies: Option<PathBuf>,
}

/// Fully resolved settings the backend starts with.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub transcripts_root: PathBuf,
    pub host: String,
    pub port: u16,
    pub ytdlp_path: PathBuf,
    pub ytdlp_cookies: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        EnvConfig::default().into()
    }
}

impl From<EnvConfig> for RuntimeConfig {
    fn from(cfg: EnvConfig) -> Self {
        Self {
            transcripts_root: cfg
                .transcripts_root
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TRANSCRIPTS_ROOT)),
            host: cfg.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: cfg.port.unwrap_or(DEFAULT_PORT),
            ytdlp_path: cfg.ytdlp_path.unwrap_or_else(|| PathBuf::from(DEFAULT_YTDLP)),
            ytdlp_cookies: cfg.ytdlp_cookies,
        }
    }
}

pub fn read_env_config(path: &Path) -> Result<Option<EnvConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    let mut cfg = EnvConfig::default();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some((key, value_raw)) = trimmed.split_once('=') {
            let value = value_raw.trim().trim_matches('"');
            if value.is_empty() {
                continue;
            }
            match key.trim() {
                "TRANSCRIPTS_ROOT" => cfg.transcripts_root = Some(PathBuf::from(value)),
                "TRANSCRIPT_API_HOST" => cfg.host = Some(value.to_string()),
                "TRANSCRIPT_API_PORT" => {
                    let port: u16 = value.parse().with_context(|| {
                        format!("Parsing TRANSCRIPT_API_PORT from {}", path.display())
                    })?;
                    cfg.port = Some(port);
                }
                "YTDLP_PATH" => cfg.ytdlp_path = Some(PathBuf::from(value)),
                "YTDLP_COOKIES" => cfg.ytdlp_cookies = Some(PathBuf::from(value)),
                _ => {}
            }
        }
    }
    Ok(Some(cfg))
}

/// Loads the env file if it exists, otherwise falls back to defaults.
pub fn load_runtime_config_from(path: impl AsRef<Path>) -> Result<RuntimeConfig> {
    let cfg = read_env_config(path.as_ref())?.unwrap_or_default();
    Ok(cfg.into())
}

pub fn load_runtime_config() -> Result<RuntimeConfig> {
    load_runtime_config_from(DEFAULT_CONFIG_PATH)
}
