//! Lens Core - Multi-provider vision client.
//!
//! Lens sends an image and a prompt to third-party vision AI providers and
//! returns the first usable answer, failing over between providers when one is
//! unavailable, rate limited, or returns malformed data.
//!
//! # Architecture
//!
//! ```text
//! analyze(prompt, image)
//!   → Registry (ordered providers) → Adapter.format_request → Transport
//!   → Adapter.parse_response → AnalysisResult
//!   (HealthTracker updated on every attempt)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use lens_core::{Config, KeyStore, VisionClient, CLASSIFY_PROMPT};
//!
//! #[tokio::main]
//! async fn main() -> lens_core::Result<()> {
//!     let config = Config::load()?;
//!     let keys = KeyStore::from_config(&config.credentials);
//!     let client = VisionClient::from_config(&config, keys);
//!
//!     let result = client.analyze(CLASSIFY_PROMPT, &image_base64).await?;
//!     println!("{} answered: {}", result.provider_name, result.content);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod classification;
pub mod config;
pub mod credentials;
pub mod error;
pub mod provider;
pub mod types;

// Re-exports for convenient access
pub use classification::{Bin, Classification, ClassifiedItem, CLASSIFY_PROMPT};
pub use config::Config;
pub use credentials::{CredentialLookup, KeyStore};
pub use error::{
    AggregatedFailure, AnalyzeError, ClassificationError, ConfigError, LensError, ProviderError,
    ProviderResult, Result,
};
pub use provider::{
    Adapter, AuthType, HealthRecord, ProviderConfig, Registry, RetryPolicy, VisionClient,
};
pub use types::{AnalysisResult, AnalyzeRequest};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
