//! Host configuration read from the environment at startup.

use core::fmt;
use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_FONT_PATH: &str = "umplus_j10r.bdf";
const DEFAULT_TICK_MS: u64 = 33;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 90;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HostConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub font_path: PathBuf,
    /// Optional path the presenter rewrites with a PPM of every frame.
    pub frame_out: Option<PathBuf>,
    /// Optional file replacing the built-in opening prompt.
    pub prompt_path: Option<PathBuf>,
    pub tick: Duration,
    pub request_timeout: Duration,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{key} is not set"),
            ConfigError::Invalid { key, value } => write!(f, "{key}={value:?} is not valid"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl HostConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = non_empty("OPENAI_APIKEY").ok_or(ConfigError::Missing("OPENAI_APIKEY"))?;
        let tick_ms = parse_u64(&lookup, "GROTTO_TICK_MS", DEFAULT_TICK_MS)?;
        let timeout_secs = parse_u64(&lookup, "GROTTO_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;

        Ok(Self {
            api_key,
            api_url: non_empty("GROTTO_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            model: non_empty("GROTTO_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            font_path: non_empty("GROTTO_FONT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FONT_PATH)),
            frame_out: non_empty("GROTTO_FRAME_OUT").map(PathBuf::from),
            prompt_path: non_empty("GROTTO_PROMPT").map(PathBuf::from),
            tick: Duration::from_millis(tick_ms.max(1)),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_u64<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
