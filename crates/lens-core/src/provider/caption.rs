//! Caption-only adapter (Jina-style).
//!
//! These services return a single caption; the prompt is forwarded but may be
//! ignored by the provider.

use super::adapter::{
    invalid_structure, require_body, require_inputs, strip_data_url, Adapter, ParsedContent,
};
use crate::error::{ProviderError, ProviderResult};
use serde::Serialize;
use serde_json::Value;

/// Caption-style adapter.
#[derive(Debug, Clone, Default)]
pub struct CaptionAdapter;

#[derive(Serialize)]
struct CaptionRequest<'a> {
    image: &'a str,
    prompt: &'a str,
}

impl Adapter for CaptionAdapter {
    fn label(&self) -> &str {
        "Jina"
    }

    fn format_request(&self, prompt: &str, image: &str) -> ProviderResult<Value> {
        require_inputs(prompt, image)?;

        serde_json::to_value(CaptionRequest {
            image: strip_data_url(image),
            prompt,
        })
        .map_err(|e| ProviderError::InvalidArgument(format!("Failed to encode request: {e}")))
    }

    fn parse_response(&self, body: &Value) -> ProviderResult<ParsedContent> {
        require_body(self.label(), body)?;

        body.get("caption")
            .and_then(Value::as_str)
            .filter(|caption| !caption.is_empty())
            .map(|caption| ParsedContent {
                content: caption.to_string(),
            })
            .ok_or_else(|| invalid_structure(self.label(), "missing caption"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_request_shape() {
        let body = CaptionAdapter
            .format_request("identify item", "data:image/jpeg;base64,QUJD")
            .unwrap();
        assert_eq!(body, json!({"image": "QUJD", "prompt": "identify item"}));
    }

    #[test]
    fn test_parse_response_valid() {
        let parsed = CaptionAdapter
            .parse_response(&json!({"caption": "a cardboard box"}))
            .unwrap();
        assert_eq!(parsed.content, "a cardboard box");
    }

    #[test]
    fn test_parse_response_missing_caption() {
        let err = CaptionAdapter
            .parse_response(&json!({"text": "a cardboard box"}))
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponseStructure { .. }));
    }
}
