use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use crate::error::{AppError, Result};
use crate::llm::{AiMode, AiSettings};

pub const DEFAULT_PROMPT: &str = "Describe the following text";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub api_key: String,
    pub ai_base_url: String,
    pub ai_model: String,
    pub ai_timeout: Duration,
    pub ai: AiSettings,
    pub excerpt_chars: usize,
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
    pub request_timeout: Duration,
    pub max_upload_bytes: usize,
    /// Serve error pages with 200 instead of the error's own status.
    pub legacy_error_status: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, applying defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::ConfigError("API_KEY must be set".to_string()))?;

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let ip = IpAddr::from_str(&host)
            .map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;
        let port: u16 = parse_or(&lookup, "PORT", 3000)?;

        let mode = match lookup("AI_MODE") {
            Some(raw) => raw.parse::<AiMode>()?,
            None => AiMode::Describe,
        };

        let ai = AiSettings {
            mode,
            prompt: lookup("PROMPT").unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
            temperature: parse_or(&lookup, "AI_TEMPERATURE", 0.7)?,
            max_tokens: parse_or(&lookup, "AI_MAX_TOKENS", 800)?,
            rounds: parse_or(&lookup, "TRANSLATION_ROUNDS", 10)?,
        };

        let excerpt_chars: usize = parse_or(&lookup, "EXCERPT_CHARS", 500)?;
        if excerpt_chars == 0 {
            return Err(AppError::ConfigError("EXCERPT_CHARS must be positive".to_string()));
        }

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            api_key,
            ai_base_url: lookup("AI_BASE_URL")
                .unwrap_or_else(|| "https://openrouter.ai/api/v1".to_string()),
            ai_model: lookup("AI_MODEL")
                .unwrap_or_else(|| "deepseek/deepseek-chat-v3-0324".to_string()),
            ai_timeout: Duration::from_secs(parse_or(&lookup, "AI_TIMEOUT_SECS", 60)?),
            ai,
            excerpt_chars,
            upload_dir: lookup("UPLOAD_DIR").unwrap_or_else(|| "./uploads".to_string()).into(),
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| "./static".to_string()).into(),
            request_timeout: Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 90)?),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            legacy_error_status: parse_or(&lookup, "LEGACY_ERROR_STATUS", false)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::ConfigError(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}
