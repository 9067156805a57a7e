//! Provider descriptors and the ordered provider registry.
//!
//! The registry is built once per client from the credentials available at
//! that moment. Its order is the failover priority and never changes.

use super::adapter::Adapter;
use super::chat::ChatAdapter;
use super::gemini::GeminiAdapter;
use crate::config::ProvidersConfig;
use crate::credentials::{CredentialLookup, GOOGLE, OPENROUTER};
use crate::error::{ConfigError, ProviderError, ProviderResult};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Retries per provider unless configured otherwise.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// How a credential is attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthType {
    None,
    /// `Authorization: Bearer <key>` header
    Bearer,
    /// `?key=<key>` appended to the endpoint
    QueryParam,
}

impl std::fmt::Display for AuthType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AuthType::None => "none",
            AuthType::Bearer => "bearer",
            AuthType::QueryParam => "query-param",
        };
        f.write_str(s)
    }
}

/// Immutable description of one provider endpoint.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Unique id, also the health-record key
    pub name: String,
    pub endpoint: String,
    pub adapter: Arc<dyn Adapter>,
    /// Retries after the first attempt (2 means 3 tries)
    pub max_retries: u32,
    pub timeout_ms: u64,
    pub requires_auth: bool,
    pub auth_type: AuthType,
    /// Credential family whose key authenticates this provider
    pub credential_id: Option<String>,
    pub model: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("adapter", &self.adapter.label())
            .field("max_retries", &self.max_retries)
            .field("timeout_ms", &self.timeout_ms)
            .field("requires_auth", &self.requires_auth)
            .field("auth_type", &self.auth_type)
            .field("credential_id", &self.credential_id)
            .field("model", &self.model)
            .finish()
    }
}

impl ProviderConfig {
    /// Unauthenticated provider with default retry budget and a 30s timeout.
    pub fn new(name: &str, endpoint: &str, adapter: Arc<dyn Adapter>) -> Self {
        Self {
            name: name.to_string(),
            endpoint: endpoint.to_string(),
            adapter,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_ms: 30_000,
            requires_auth: false,
            auth_type: AuthType::None,
            credential_id: None,
            model: None,
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Require a key from `credential_id`, attached as `auth_type`.
    pub fn with_auth(mut self, auth_type: AuthType, credential_id: &str) -> Self {
        self.requires_auth = auth_type != AuthType::None;
        self.auth_type = auth_type;
        self.credential_id = Some(credential_id.to_string());
        self
    }

    /// Total tries allowed for one call: the first attempt plus retries.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Resolve the request URL and extra headers for this provider.
    ///
    /// Credentials are only attached when `requires_auth` is set.
    pub fn resolve_auth(
        &self,
        credentials: &dyn CredentialLookup,
    ) -> ProviderResult<(String, Vec<(String, String)>)> {
        if !self.requires_auth || self.auth_type == AuthType::None {
            return Ok((self.endpoint.clone(), Vec::new()));
        }

        let family = self.credential_id.as_deref().unwrap_or(&self.name);
        let key = credentials
            .get_key(family)
            .ok_or_else(|| ProviderError::MissingCredential {
                family: family.to_string(),
            })?;

        match self.auth_type {
            AuthType::Bearer => Ok((
                self.endpoint.clone(),
                vec![("Authorization".to_string(), format!("Bearer {key}"))],
            )),
            AuthType::QueryParam => {
                let separator = if self.endpoint.contains('?') { '&' } else { '?' };
                Ok((format!("{}{separator}key={key}", self.endpoint), Vec::new()))
            }
            AuthType::None => Ok((self.endpoint.clone(), Vec::new())),
        }
    }
}

// --- Catalogue ---

const POLLINATIONS_ENDPOINT: &str = "https://text.pollinations.ai/openai";

/// Free tier: (model, timeout_ms). Always present, always first.
const POLLINATIONS_MODELS: &[(&str, u64)] = &[("gemini", 30_000), ("bidara", 30_000)];

/// Gemini models, fastest first: (model id, short name, timeout_ms).
const GEMINI_MODELS: &[(&str, &str, u64)] = &[
    ("gemini-flash-lite-latest", "flash-lite", 10_000),
    ("gemini-2.5-flash-lite", "2.5-flash-lite", 12_000),
    ("gemini-flash-latest", "flash", 15_000),
    ("gemini-2.5-flash", "2.5-flash", 20_000),
];

const OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// OpenRouter free vision models: (model id, short name, timeout_ms).
const OPENROUTER_MODELS: &[(&str, &str, u64)] = &[
    ("allenai/molmo-2-8b:free", "molmo-2-8b", 30_000),
    ("google/gemma-3-12b-it:free", "gemma-3-12b", 35_000),
    ("google/gemma-3-4b-it:free", "gemma-3-4b", 30_000),
    ("qwen/qwen-2.5-vl-7b-instruct:free", "qwen-vl-7b", 35_000),
    ("nvidia/nemotron-nano-12b-v2-vl:free", "nemotron-12b", 35_000),
    ("google/gemma-3-27b-it:free", "gemma-3-27b", 35_000),
];

fn pollinations_providers(max_retries: u32) -> Vec<ProviderConfig> {
    POLLINATIONS_MODELS
        .iter()
        .map(|&(model, timeout_ms)| {
            let adapter = ChatAdapter::new("Pollinations", model).with_max_tokens(1000);
            ProviderConfig::new(
                &format!("pollinations-{model}"),
                POLLINATIONS_ENDPOINT,
                Arc::new(adapter),
            )
            .with_model(model)
            .with_timeout_ms(timeout_ms)
            .with_max_retries(max_retries)
        })
        .collect()
}

fn gemini_providers(max_retries: u32) -> Vec<ProviderConfig> {
    GEMINI_MODELS
        .iter()
        .map(|&(id, short, timeout_ms)| {
            let model = format!("models/{id}");
            let endpoint = format!(
                "https://generativelanguage.googleapis.com/v1beta/models/{id}:generateContent"
            );
            ProviderConfig::new(
                &format!("google-gemini-{short}"),
                &endpoint,
                Arc::new(GeminiAdapter),
            )
            .with_model(&model)
            .with_timeout_ms(timeout_ms)
            .with_max_retries(max_retries)
            .with_auth(AuthType::QueryParam, GOOGLE)
        })
        .collect()
}

fn openrouter_providers(max_retries: u32) -> Vec<ProviderConfig> {
    OPENROUTER_MODELS
        .iter()
        .map(|&(id, short, timeout_ms)| {
            ProviderConfig::new(
                &format!("openrouter-{short}"),
                OPENROUTER_ENDPOINT,
                Arc::new(ChatAdapter::new("OpenRouter", id)),
            )
            .with_model(id)
            .with_timeout_ms(timeout_ms)
            .with_max_retries(max_retries)
            .with_auth(AuthType::Bearer, OPENROUTER)
        })
        .collect()
}

/// Ordered, read-only list of providers.
#[derive(Debug, Clone)]
pub struct Registry {
    providers: Vec<ProviderConfig>,
}

impl Registry {
    /// Build the default catalogue for the given credentials.
    pub fn build(credentials: &dyn CredentialLookup) -> Self {
        Self::build_with(credentials, &ProvidersConfig::default())
    }

    /// Build the default catalogue with configured operational parameters.
    ///
    /// The free tier comes first; each credential family whose key is present
    /// appends its models in declared order.
    pub fn build_with(credentials: &dyn CredentialLookup, settings: &ProvidersConfig) -> Self {
        let mut providers = pollinations_providers(settings.max_retries);

        type Family = (&'static str, fn(u32) -> Vec<ProviderConfig>);
        let families: [Family; 2] = [
            (GOOGLE, gemini_providers),
            (OPENROUTER, openrouter_providers),
        ];

        for (family, make) in families {
            if credentials.has_key(family) {
                let added = make(settings.max_retries);
                tracing::debug!(family, count = added.len(), "Added credentialed providers");
                providers.extend(added);
            }
        }

        Self { providers }
    }

    /// Wrap a caller-supplied provider list, keeping its order.
    pub fn from_providers(providers: Vec<ProviderConfig>) -> Result<Self, ConfigError> {
        if providers.is_empty() {
            return Err(ConfigError::ValidationError(
                "registry must contain at least one provider".into(),
            ));
        }
        let mut seen = HashSet::new();
        for provider in &providers {
            if !seen.insert(provider.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate provider name: {}",
                    provider.name
                )));
            }
            if provider.timeout_ms == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "provider {} timeout_ms must be > 0",
                    provider.name
                )));
            }
        }
        Ok(Self { providers })
    }

    pub fn providers(&self) -> &[ProviderConfig] {
        &self.providers
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
