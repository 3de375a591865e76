//! Configuration management for crudgen.
//!
//! Configuration can be set via environment variables (a `.env` file is
//! loaded first when present):
//! - `OPENAI_API_KEY` - Required. API key for the chat-completions backend.
//! - `OPENAI_BASE_URL` - Optional. Backend base URL. Defaults to `https://api.openai.com/v1`.
//! - `DEFAULT_MODEL` - Optional. Model used for generation. Defaults to `gpt-3.5-turbo`.
//! - `TEMPERATURE` - Optional. Sampling temperature. Defaults to `0.2`.
//! - `OUTPUT_DIR` - Optional. Root directory for generated files. Defaults to `./Output`.
//! - `LANGUAGE_ORACLE_URL` - Optional. Endpoint answering `{lang}`. Defaults to `http://localhost:9090/prompt`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `9191`.
//! - `CONVERSATION_ROUNDS` - Optional. Backend calls per task. Defaults to `2`.
//! - `CONVERSATION_MODE` - Optional. `fixed` or `until_idle`. Defaults to `fixed`.

use std::path::PathBuf;
use thiserror::Error;

use crate::agent::RoundLimit;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LANGUAGE_ORACLE_URL: &str = "http://localhost:9090/prompt";
pub const DEFAULT_ROUNDS: usize = 2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend API key
    pub api_key: String,

    /// Backend base URL (OpenAI-compatible)
    pub llm_base_url: String,

    /// Model identifier sent with every request
    pub default_model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Root directory generated files are written under
    pub output_dir: PathBuf,

    /// Endpoint of the language oracle
    pub language_oracle_url: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// How many rounds each task's conversation may run
    pub round_limit: RoundLimit,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `OPENAI_API_KEY` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))?;

        let llm_base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let default_model =
            std::env::var("DEFAULT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let temperature = std::env::var("TEMPERATURE")
            .ok()
            .map(|v| {
                v.parse::<f32>()
                    .map_err(|e| ConfigError::InvalidValue("TEMPERATURE".to_string(), format!("{}", e)))
            })
            .transpose()?
            .unwrap_or(DEFAULT_TEMPERATURE);

        let output_dir = std::env::var("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./Output"));

        let language_oracle_url = std::env::var("LANGUAGE_ORACLE_URL")
            .unwrap_or_else(|_| DEFAULT_LANGUAGE_ORACLE_URL.to_string());

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "9191".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let rounds = std::env::var("CONVERSATION_ROUNDS")
            .ok()
            .map(|v| {
                v.parse::<usize>().map_err(|e| {
                    ConfigError::InvalidValue("CONVERSATION_ROUNDS".to_string(), format!("{}", e))
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_ROUNDS);

        let mode = std::env::var("CONVERSATION_MODE").unwrap_or_else(|_| "fixed".to_string());
        let round_limit = parse_round_limit(&mode, rounds)
            .map_err(|e| ConfigError::InvalidValue("CONVERSATION_MODE".to_string(), e))?;

        Ok(Self {
            api_key,
            llm_base_url,
            default_model,
            temperature,
            output_dir,
            language_oracle_url,
            host,
            port,
            round_limit,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: String, output_dir: PathBuf) -> Self {
        Self {
            api_key,
            llm_base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            output_dir,
            language_oracle_url: DEFAULT_LANGUAGE_ORACLE_URL.to_string(),
            host: "127.0.0.1".to_string(),
            port: 9191,
            round_limit: RoundLimit::Fixed(DEFAULT_ROUNDS),
        }
    }
}

fn parse_round_limit(mode: &str, rounds: usize) -> Result<RoundLimit, String> {
    if rounds == 0 {
        return Err("conversation needs at least one round".to_string());
    }
    match mode.trim().to_lowercase().as_str() {
        "fixed" => Ok(RoundLimit::Fixed(rounds)),
        "until_idle" | "until-idle" => Ok(RoundLimit::UntilIdle { max: rounds }),
        other => Err(format!("expected 'fixed' or 'until_idle', got: {}", other)),
    }
}
