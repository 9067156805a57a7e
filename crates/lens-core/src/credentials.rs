//! Credential lookup for auth-gated provider families.
//!
//! The registry and client only need to ask "is a key configured for family X"
//! and "what is it". `KeyStore` is the in-memory implementation used by the CLI;
//! embedders can supply their own `CredentialLookup`.

use std::collections::HashMap;

/// Family id for Google Gemini keys.
pub const GOOGLE: &str = "google";

/// Family id for OpenRouter keys.
pub const OPENROUTER: &str = "openrouter";

/// Capability answering key presence and value per credential family.
pub trait CredentialLookup: Send + Sync {
    /// Whether a non-empty key is configured for `id`.
    fn has_key(&self, id: &str) -> bool {
        self.get_key(id).is_some()
    }

    /// The key for `id`, if one is configured.
    fn get_key(&self, id: &str) -> Option<String>;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.trim().is_empty())
    } else if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// In-memory key store keyed by credential family id.
#[derive(Debug, Clone, Default)]
pub struct KeyStore {
    keys: HashMap<String, String>,
}

impl KeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `family -> value` pairs, resolving `${ENV_VAR}` values.
    ///
    /// Entries that resolve to nothing are skipped.
    pub fn from_config<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut store = Self::new();
        for (family, value) in entries {
            match resolve_env_var(value) {
                Some(key) => store.set_key(family, &key),
                None => tracing::debug!(family = %family, "No credential configured"),
            }
        }
        store
    }

    /// Store a key, trimming surrounding whitespace.
    pub fn set_key(&mut self, family: &str, key: &str) {
        self.keys.insert(family.to_string(), key.trim().to_string());
    }

    pub fn remove_key(&mut self, family: &str) {
        self.keys.remove(family);
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Families with a non-empty key, sorted.
    pub fn configured_families(&self) -> Vec<String> {
        let mut families: Vec<String> = self
            .keys
            .iter()
            .filter(|(_, key)| !key.is_empty())
            .map(|(family, _)| family.clone())
            .collect();
        families.sort();
        families
    }
}

impl CredentialLookup for KeyStore {
    fn get_key(&self, id: &str) -> Option<String> {
        self.keys.get(id).filter(|key| !key.is_empty()).cloned()
    }
}
