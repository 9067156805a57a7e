//! Failover orchestrator.
//!
//! `VisionClient::analyze` walks the registry in priority order. Each provider
//! gets up to `max_retries + 1` attempts with capped exponential backoff
//! between them; a 429 abandons the provider at once. The first successful
//! parse wins. Calls run sequentially per `analyze`; concurrent `analyze`
//! calls share only the health tracker.
//!
//! Dropping the returned future cancels the in-flight request and any pending
//! backoff sleep.

use super::health::{HealthRecord, HealthTracker};
use super::registry::{ProviderConfig, Registry};
use super::retry::{classify, Disposition, RetryPolicy};
use super::transport::{ReqwestTransport, Transport};
use crate::config::Config;
use crate::credentials::{CredentialLookup, KeyStore};
use crate::error::{AggregatedFailure, AnalyzeError, ProviderError, ProviderResult};
use crate::types::{AnalysisResult, AnalyzeRequest};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Longest slice of an error response body kept in `ProviderError::Http`.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Multi-provider vision client.
pub struct VisionClient {
    registry: Registry,
    credentials: Arc<dyn CredentialLookup>,
    transport: Arc<dyn Transport>,
    health: HealthTracker,
    policy: RetryPolicy,
}

impl VisionClient {
    pub fn new(
        registry: Registry,
        credentials: Arc<dyn CredentialLookup>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let health = HealthTracker::new(registry.names());
        Self {
            registry,
            credentials,
            transport,
            health,
            policy: RetryPolicy::default(),
        }
    }

    /// Build a client over the default catalogue and a `reqwest` transport.
    ///
    /// `keys` decides which gated families join the registry; callers usually
    /// start from `KeyStore::from_config(&config.credentials)`.
    pub fn from_config(config: &Config, keys: KeyStore) -> Self {
        let registry = Registry::build_with(&keys, &config.providers);
        Self::new(registry, Arc::new(keys), Arc::new(ReqwestTransport::new()))
            .with_retry_policy(config.retry.policy())
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn providers(&self) -> &[ProviderConfig] {
        self.registry.providers()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Snapshot of per-provider health counters.
    pub fn health(&self) -> BTreeMap<String, HealthRecord> {
        self.health.snapshot()
    }

    /// Analyze an image, failing over across providers until one succeeds.
    ///
    /// Returns `AnalyzeError::InvalidRequest` without contacting any provider
    /// when the prompt or image is blank, and `AllProvidersFailed` once every
    /// provider has been exhausted or rate limited.
    pub async fn analyze(&self, prompt: &str, image: &str) -> Result<AnalysisResult, AnalyzeError> {
        let request = AnalyzeRequest::new(prompt, image)?;

        let mut attempted = Vec::new();
        let mut rate_limited = Vec::new();
        let mut last_error: Option<ProviderError> = None;

        for provider in self.registry.providers() {
            tracing::info!(provider = %provider.name, "Trying provider");
            let max_attempts = provider.max_attempts();
            let mut attempt: u32 = 0;

            loop {
                let start = Instant::now();
                let outcome = self.attempt(provider, &request).await;
                let elapsed_ms = start.elapsed().as_millis() as u64;

                let error = match outcome {
                    Ok(content) => {
                        self.health.record_success(&provider.name);
                        tracing::info!(
                            provider = %provider.name,
                            attempt = attempt + 1,
                            elapsed_ms,
                            "Provider succeeded"
                        );
                        return Ok(AnalysisResult {
                            content,
                            provider_name: provider.name.clone(),
                            timestamp: Utc::now(),
                            elapsed_ms,
                            attempt_number: attempt + 1,
                        });
                    }
                    Err(error) => error,
                };

                self.health.record_failure(&provider.name);

                match classify(&error) {
                    // A 429 never replaces the last real failure.
                    Disposition::Abandon => {
                        tracing::warn!(
                            provider = %provider.name,
                            attempt = attempt + 1,
                            "Rate limited (429), moving to next provider"
                        );
                        rate_limited.push(provider.name.clone());
                        break;
                    }
                    Disposition::Surface => {
                        return Err(AnalyzeError::InvalidRequest(error.to_string()));
                    }
                    Disposition::Retry => {
                        tracing::warn!(
                            provider = %provider.name,
                            attempt = attempt + 1,
                            max_attempts,
                            error = %error,
                            "Provider attempt failed"
                        );
                        last_error = Some(error);

                        if attempt >= provider.max_retries {
                            attempted.push(provider.name.clone());
                            break;
                        }

                        let delay = self.policy.backoff_duration(attempt);
                        tracing::debug!(provider = %provider.name, ?delay, "Backing off");
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                }
            }
        }

        if last_error.is_none() && !rate_limited.is_empty() {
            last_error = Some(ProviderError::RateLimited);
        }

        let failure = AggregatedFailure {
            attempted_provider_names: attempted,
            rate_limited_provider_names: rate_limited,
            last_error_message: last_error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "Unknown".to_string()),
            last_error_cause: last_error,
        };
        tracing::error!(%failure, "All providers failed");
        Err(failure.into())
    }

    /// One request/response round trip against one provider.
    async fn attempt(
        &self,
        provider: &ProviderConfig,
        request: &AnalyzeRequest,
    ) -> ProviderResult<String> {
        let body = provider
            .adapter
            .format_request(&request.prompt, &request.image)?;
        let (url, headers) = provider.resolve_auth(self.credentials.as_ref())?;

        let timeout = Duration::from_millis(provider.timeout_ms);
        let response = tokio::time::timeout(
            timeout,
            self.transport.post_json(&url, &headers, &body, timeout),
        )
        .await
        .map_err(|_| ProviderError::Timeout {
            timeout_ms: provider.timeout_ms,
        })??;

        if response.status == 429 {
            return Err(ProviderError::RateLimited);
        }
        if !response.is_success() {
            return Err(ProviderError::Http {
                status: response.status,
                body: response.body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let data = response.json()?;
        Ok(provider.adapter.parse_response(&data)?.content)
    }
}
