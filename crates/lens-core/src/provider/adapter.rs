//! Adapter trait and shared helpers.
//!
//! An adapter translates between the canonical `(prompt, image)` pair and one
//! provider wire format. Adapters are pure: no I/O, no shared state.

use crate::error::{ProviderError, ProviderResult};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// MIME type sent when the caller passes raw base64 without a data URL.
pub const DEFAULT_MEDIA_TYPE: &str = "image/jpeg";

/// Content extracted from a provider response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedContent {
    pub content: String,
}

/// Translation between the canonical request/result and a provider wire format.
pub trait Adapter: Send + Sync {
    /// Human-readable wire family label used in error messages (e.g., "OpenRouter").
    fn label(&self) -> &str;

    /// Build the provider-native JSON request body.
    fn format_request(&self, prompt: &str, image: &str) -> ProviderResult<Value>;

    /// Extract text content from a decoded provider response body.
    fn parse_response(&self, body: &Value) -> ProviderResult<ParsedContent>;
}

/// Reject empty prompt or image input.
pub(crate) fn require_inputs(prompt: &str, image: &str) -> ProviderResult<()> {
    if prompt.trim().is_empty() || image.trim().is_empty() {
        return Err(ProviderError::InvalidArgument(
            "Prompt and image data are required".to_string(),
        ));
    }
    Ok(())
}

/// Reject a null response body.
pub(crate) fn require_body(label: &str, body: &Value) -> ProviderResult<()> {
    if body.is_null() {
        return Err(invalid_structure(label, "response body is empty"));
    }
    Ok(())
}

pub(crate) fn invalid_structure(label: &str, detail: &str) -> ProviderError {
    ProviderError::InvalidResponseStructure {
        provider: label.to_string(),
        detail: detail.to_string(),
    }
}

/// Split an image argument into `(media type, base64 payload)`.
///
/// Accepts either raw base64 or a `data:<mime>;base64,<payload>` URL. Everything
/// after the first comma is the payload; a data URL with nothing after the comma
/// is passed through unchanged.
pub fn split_data_url(image: &str) -> (Option<&str>, &str) {
    if !image.starts_with("data:") {
        return (None, image);
    }
    match image.split_once(',') {
        Some((header, payload)) if !payload.is_empty() => {
            let media_type = header
                .trim_start_matches("data:")
                .split(';')
                .next()
                .filter(|m| !m.is_empty());
            (media_type, payload)
        }
        _ => (None, image),
    }
}

/// Return the bare base64 payload of an image argument.
pub fn strip_data_url(image: &str) -> &str {
    split_data_url(image).1
}

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"```(?:json)?\n?([\s\S]*?)\n?```").expect("fence pattern is valid")
    })
}

/// Unwrap the first Markdown fenced code block, if any.
///
/// Content without a fence is returned unchanged.
pub fn strip_markdown_fence(content: &str) -> String {
    fence_pattern()
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|inner| inner.as_str().to_string())
        .unwrap_or_else(|| content.to_string())
}
