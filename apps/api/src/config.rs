use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::retry::RetryConfig;
use crate::llm_client::LlmConfig;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub azure_openai_endpoint: String,
    pub azure_openai_api_key: String,
    pub azure_openai_deployment: String,
    pub azure_openai_api_version: String,
    /// Upper bound on one whole generation, retries included.
    pub generation_timeout: Duration,
    pub llm_max_retries: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            azure_openai_endpoint: require_env("AZURE_OPENAI_ENDPOINT")?,
            azure_openai_api_key: require_env("AZURE_OPENAI_API_KEY")?,
            azure_openai_deployment: env_or("AZURE_OPENAI_DEPLOYMENT", "gpt-4o"),
            azure_openai_api_version: env_or("AZURE_OPENAI_API_VERSION", "2024-06-01"),
            generation_timeout: Duration::from_secs(parse_env(
                "GENERATION_TIMEOUT_SECS",
                std::env::var("GENERATION_TIMEOUT_SECS").ok(),
                30,
            )?),
            llm_max_retries: parse_env(
                "LLM_MAX_RETRIES",
                std::env::var("LLM_MAX_RETRIES").ok(),
                2,
            )?,
            port: parse_env("PORT", std::env::var("PORT").ok(), 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    /// Client settings for the completion service. Each HTTP attempt gets an
    /// equal share of the generation timeout, so a hung attempt leaves room to
    /// retry; the generator still bounds the total.
    pub fn llm_config(&self) -> LlmConfig {
        let attempts = self.llm_max_retries.saturating_add(1);
        LlmConfig {
            endpoint: self.azure_openai_endpoint.clone(),
            api_key: self.azure_openai_api_key.clone(),
            deployment: self.azure_openai_deployment.clone(),
            api_version: self.azure_openai_api_version.clone(),
            http_timeout: self.generation_timeout / attempts,
            retry: RetryConfig::default().max_retries(self.llm_max_retries),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
