//! Vision provider integration.
//!
//! Adapters translate the canonical request into each provider's wire format,
//! the registry orders providers by priority, and `VisionClient` fails over
//! across them with retries, rate-limit handling and health bookkeeping.

pub mod adapter;
pub mod caption;
pub mod chat;
pub(crate) mod client;
pub mod gemini;
pub(crate) mod health;
pub mod inference;
pub mod registry;
pub mod retry;
pub mod transport;

pub use adapter::{Adapter, ParsedContent};
pub use client::VisionClient;
pub use health::{HealthRecord, HealthTracker};
pub use registry::{AuthType, ProviderConfig, Registry};
pub use retry::RetryPolicy;
pub use transport::{HttpResponse, ReqwestTransport, Transport};
