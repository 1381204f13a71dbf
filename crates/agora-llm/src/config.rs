//! Generation settings
//!
//! Sampling knobs are passed through to the backend unmodified. Defaults can
//! be overridden from the environment.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Error types for configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Sampling and context settings for a completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Temperature (env: AGORA_TEMPERATURE)
    pub temperature: f32,
    /// Top-k sampling (env: AGORA_TOP_K)
    pub top_k: u32,
    /// Nucleus sampling (env: AGORA_TOP_P)
    pub top_p: f32,
    /// Maximum output tokens (env: AGORA_MAX_OUTPUT_TOKENS)
    pub max_output_tokens: u32,
    /// Most recent history entries sent with a request (env: AGORA_HISTORY_LIMIT)
    pub history_limit: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 8192,
            history_limit: 50,
        }
    }
}

impl GenerationConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            temperature: parse_or(&lookup, "AGORA_TEMPERATURE", defaults.temperature)?,
            top_k: parse_or(&lookup, "AGORA_TOP_K", defaults.top_k)?,
            top_p: parse_or(&lookup, "AGORA_TOP_P", defaults.top_p)?,
            max_output_tokens: parse_or(
                &lookup,
                "AGORA_MAX_OUTPUT_TOKENS",
                defaults.max_output_tokens,
            )?,
            history_limit: parse_or(&lookup, "AGORA_HISTORY_LIMIT", defaults.history_limit)?,
        })
    }
}

/// Parse `key` if present, otherwise return `default`
pub fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("{} has invalid value '{}'", key, raw))),
        None => Ok(default),
    }
}
