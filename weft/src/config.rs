//! Engine settings read from the process environment.
//!
//! Call `env_config::load_and_apply("weft", None)` first so `.env` and the XDG
//! `config.toml` are applied; then `EngineConfig::from_env()` reads the `WEFT_*` keys.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::graph::DEFAULT_MAX_STEPS;

pub const ENV_MAX_STEPS: &str = "WEFT_MAX_STEPS";
pub const ENV_TOOL_TIMEOUT_MS: &str = "WEFT_TOOL_TIMEOUT_MS";
pub const ENV_REFLECTION_MESSAGE_LIMIT: &str = "WEFT_REFLECTION_MESSAGE_LIMIT";
pub const ENV_REFLEXION_MAX_ITERATIONS: &str = "WEFT_REFLEXION_MAX_ITERATIONS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },
}

/// Defaults for graph runs and the demo loops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Step cap for runs whose `RunConfig` does not set one.
    pub max_steps: usize,
    /// Per-call timeout for the tool node; `None` waits indefinitely.
    pub tool_timeout: Option<Duration>,
    /// The reflection loop ends once the history holds more messages than this.
    pub reflection_message_limit: usize,
    /// The reflexion loop ends once the history holds more tool results than this.
    pub reflexion_max_iterations: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            tool_timeout: None,
            reflection_message_limit: 6,
            reflexion_max_iterations: 2,
        }
    }
}

fn parse<T: FromStr>(key: &str, raw: Option<String>) -> Result<Option<T>, ConfigError> {
    match raw {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => Ok(None),
        Some(v) => v.trim().parse().map(Some).map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value: v,
        }),
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            max_steps: parse(ENV_MAX_STEPS, lookup(ENV_MAX_STEPS))?.unwrap_or(defaults.max_steps),
            tool_timeout: parse::<u64>(ENV_TOOL_TIMEOUT_MS, lookup(ENV_TOOL_TIMEOUT_MS))?
                .map(Duration::from_millis),
            reflection_message_limit: parse(
                ENV_REFLECTION_MESSAGE_LIMIT,
                lookup(ENV_REFLECTION_MESSAGE_LIMIT),
            )?
            .unwrap_or(defaults.reflection_message_limit),
            reflexion_max_iterations: parse(
                ENV_REFLEXION_MAX_ITERATIONS,
                lookup(ENV_REFLEXION_MAX_ITERATIONS),
            )?
            .unwrap_or(defaults.reflexion_max_iterations),
        })
    }
}
