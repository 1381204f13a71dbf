//! Engine configuration

use std::env;
use std::path::PathBuf;

use agora_llm::config::parse_or;
use agora_llm::{ConfigError, GenerationConfig};

/// Everything the engine reads at startup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    /// Knobs passed through to the model
    pub generation: GenerationConfig,
    /// Fallacy catalog JSON (env: AGORA_FALLACY_CATALOG); built-in when unset
    pub fallacy_catalog: Option<PathBuf>,
    /// Source policy JSON (env: AGORA_SOURCE_POLICY); built-in when unset
    pub source_policy: Option<PathBuf>,
    /// Seed for error injection (env: AGORA_SEED); OS entropy when unset
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let seed = match lookup("AGORA_SEED") {
            Some(_) => Some(parse_or(&lookup, "AGORA_SEED", 0u64)?),
            None => None,
        };

        Ok(Self {
            generation: GenerationConfig::from_lookup(&lookup)?,
            fallacy_catalog: lookup("AGORA_FALLACY_CATALOG").map(PathBuf::from),
            source_policy: lookup("AGORA_SOURCE_POLICY").map(PathBuf::from),
            seed,
        })
    }
}
