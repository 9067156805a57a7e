//! Command implementations.

pub mod analyze;
pub mod config;
pub mod providers;

use clap::Args;
use lens_core::{Config, KeyStore};

/// API key overrides shared by commands that build a registry.
#[derive(Args, Debug, Default)]
pub struct KeyArgs {
    /// Google Gemini API key (adds the Gemini models)
    #[arg(long, env = "GOOGLE_GEMINI_API_KEY", hide_env_values = true)]
    pub google_key: Option<String>,

    /// OpenRouter API key (adds the OpenRouter models)
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub openrouter_key: Option<String>,
}

impl KeyArgs {
    /// Keys from `[credentials]`, overridden by any flags given.
    pub fn key_store(&self, config: &Config) -> KeyStore {
        let mut keys = KeyStore::from_config(&config.credentials);
        let overrides = [
            (lens_core::credentials::GOOGLE, &self.google_key),
            (lens_core::credentials::OPENROUTER, &self.openrouter_key),
        ];
        for (family, key) in overrides {
            if let Some(key) = key.as_deref().filter(|k| !k.trim().is_empty()) {
                keys.set_key(family, key);
            }
        }
        keys
    }
}
