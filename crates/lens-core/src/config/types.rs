//! Sub-configuration structs with defaults.

use crate::credentials::{GOOGLE, OPENROUTER};
use crate::provider::registry::DEFAULT_MAX_RETRIES;
use crate::provider::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Backoff between retries of the same provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Delay before the first retry in milliseconds
    pub base_delay_ms: u64,

    /// Upper bound for any single delay in milliseconds
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            base_delay_ms: policy.base_delay_ms,
            max_delay_ms: policy.max_delay_ms,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            base_delay_ms: self.base_delay_ms,
            max_delay_ms: self.max_delay_ms,
        }
    }
}

/// Operational parameters applied to every registry entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Retries after the first attempt, per provider
    pub max_retries: u32,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Default `[credentials]` table: one `${ENV_VAR}` reference per family.
pub fn default_credentials() -> HashMap<String, String> {
    HashMap::from([
        (GOOGLE.to_string(), "${GOOGLE_GEMINI_API_KEY}".to_string()),
        (OPENROUTER.to_string(), "${OPENROUTER_API_KEY}".to_string()),
    ])
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
