//! Error types for the Lens vision client.
//!
//! Per-attempt failures (`ProviderError`) are absorbed by the orchestrator and
//! only ever reach the caller folded into an `AggregatedFailure`.

use thiserror::Error;

/// Top-level error type for Lens operations.
#[derive(Error, Debug)]
pub enum LensError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Analysis failed across every provider
    #[error(transparent)]
    Analyze(#[from] AnalyzeError),

    /// Provider content could not be read as a classification
    #[error("Classification error: {0}")]
    Classification(#[from] ClassificationError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Failure of a single attempt against a single provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Adapter input was empty or malformed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A 2xx response did not have the shape the adapter expects
    #[error("Invalid {provider} response structure: {detail}")]
    InvalidResponseStructure { provider: String, detail: String },

    /// The provider put an explicit `error` field in its response body
    #[error("{provider} API error: {message}")]
    ProviderReported { provider: String, message: String },

    /// Non-2xx status other than 429
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// HTTP 429
    #[error("Rate limited (HTTP 429)")]
    RateLimited,

    /// Provider requires a key that the credential lookup cannot supply
    #[error("{family} API key required but not configured")]
    MissingCredential { family: String },

    /// The attempt did not settle within the provider's timeout
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Connection, DNS or TLS failure
    #[error("Request failed: {0}")]
    Transport(String),

    /// Response body was not valid JSON
    #[error("Failed to decode response body: {0}")]
    Decode(String),
}

/// Errors surfaced to callers of `VisionClient::analyze`.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    /// Prompt or image was empty; no provider was attempted
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Every provider in the registry was exhausted or rate limited
    #[error(transparent)]
    AllProvidersFailed(#[from] AggregatedFailure),
}

/// Summary of a fully exhausted provider list.
#[derive(Debug, Clone)]
pub struct AggregatedFailure {
    /// Providers that ran out of retries, in the order they were attempted
    pub attempted_provider_names: Vec<String>,
    /// Providers abandoned after an HTTP 429, in the order they were attempted
    pub rate_limited_provider_names: Vec<String>,
    /// Message of the most recent underlying error
    pub last_error_message: String,
    /// The most recent underlying error, if any attempt produced one
    pub last_error_cause: Option<ProviderError>,
}

impl std::fmt::Display for AggregatedFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "All vision providers failed after trying: {}. Last error: {}",
            self.attempted_provider_names.join(", "),
            self.last_error_message
        )?;
        if !self.rate_limited_provider_names.is_empty() {
            write!(
                f,
                " (rate limited: {})",
                self.rate_limited_provider_names.join(", ")
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregatedFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.last_error_cause
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// The content returned by a provider is not a usable classification.
#[derive(Error, Debug)]
pub enum ClassificationError {
    /// Content was empty after stripping code fences
    #[error("Received empty content after cleaning")]
    Empty,

    /// Content was not valid JSON
    #[error("Content is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON parsed but has no `items` array
    #[error("Invalid JSON structure: 'items' array not found or invalid")]
    MissingItems,
}

/// Convenience type alias for Lens results.
pub type Result<T> = std::result::Result<T, LensError>;

/// Convenience type alias for single-attempt results.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_aggregated_failure_message_lists_providers() {
        let failure = AggregatedFailure {
            attempted_provider_names: vec!["a".into(), "b".into()],
            rate_limited_provider_names: vec![],
            last_error_message: "HTTP 503: down".into(),
            last_error_cause: Some(ProviderError::Http {
                status: 503,
                body: "down".into(),
            }),
        };
        let msg = failure.to_string();
        assert!(msg.contains("a, b"));
        assert!(msg.contains("HTTP 503"));
        assert!(failure.source().is_some());
    }

    #[test]
    fn test_missing_credential_message() {
        let err = ProviderError::MissingCredential {
            family: "openrouter".into(),
        };
        assert_eq!(
            err.to_string(),
            "openrouter API key required but not configured"
        );
    }
}
