//! Hugging Face Inference API adapter.
//!
//! Inference endpoints answer with an array of `{generated_text}` objects, or
//! with an object carrying an `error` field.

use super::adapter::{
    invalid_structure, require_body, require_inputs, strip_data_url, Adapter, ParsedContent,
};
use crate::error::{ProviderError, ProviderResult};
use serde::Serialize;
use serde_json::Value;

/// Default generation budget for inference endpoints.
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 500;

/// Inference-style adapter.
///
/// The model is addressed by the endpoint URL.
#[derive(Debug, Clone)]
pub struct InferenceAdapter {
    max_new_tokens: u32,
}

impl Default for InferenceAdapter {
    fn default() -> Self {
        Self {
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
        }
    }
}

impl InferenceAdapter {
    pub fn with_max_new_tokens(mut self, max_new_tokens: u32) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: Inputs<'a>,
    parameters: Parameters,
}

#[derive(Serialize)]
struct Inputs<'a> {
    text: &'a str,
    image: &'a str,
}

#[derive(Serialize)]
struct Parameters {
    max_new_tokens: u32,
}

impl Adapter for InferenceAdapter {
    fn label(&self) -> &str {
        "Hugging Face"
    }

    fn format_request(&self, prompt: &str, image: &str) -> ProviderResult<Value> {
        require_inputs(prompt, image)?;

        let body = InferenceRequest {
            inputs: Inputs {
                text: prompt,
                image: strip_data_url(image),
            },
            parameters: Parameters {
                max_new_tokens: self.max_new_tokens,
            },
        };

        serde_json::to_value(body)
            .map_err(|e| ProviderError::InvalidArgument(format!("Failed to encode request: {e}")))
    }

    fn parse_response(&self, body: &Value) -> ProviderResult<ParsedContent> {
        require_body(self.label(), body)?;

        if let Some(error) = body.get("error") {
            let message = match error {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Err(ProviderError::ProviderReported {
                provider: self.label().to_string(),
                message,
            });
        }

        body.as_array()
            .and_then(|items| items.first())
            .and_then(|first| first.get("generated_text"))
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(|text| ParsedContent {
                content: text.to_string(),
            })
            .ok_or_else(|| invalid_structure(self.label(), "expected [{generated_text}]"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_request_shape() {
        let adapter = InferenceAdapter::default();
        let body = adapter
            .format_request("identify item", "data:image/jpeg;base64,QUJD")
            .unwrap();
        assert_eq!(
            body,
            json!({
                "inputs": {"text": "identify item", "image": "QUJD"},
                "parameters": {"max_new_tokens": 500}
            })
        );
    }

    #[test]
    fn test_parse_response_valid() {
        let adapter = InferenceAdapter::default();
        let parsed = adapter
            .parse_response(&json!([{"generated_text": "a glass jar"}]))
            .unwrap();
        assert_eq!(parsed.content, "a glass jar");
    }

    #[test]
    fn test_parse_response_reported_error() {
        let adapter = InferenceAdapter::default();
        let err = adapter
            .parse_response(&json!({"error": "Model is currently loading"}))
            .unwrap_err();
        assert_eq!(
            err,
            ProviderError::ProviderReported {
                provider: "Hugging Face".into(),
                message: "Model is currently loading".into(),
            }
        );
    }

    #[test]
    fn test_parse_response_not_an_array() {
        let adapter = InferenceAdapter::default();
        let err = adapter
            .parse_response(&json!({"generated_text": "x"}))
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponseStructure { .. }));
    }

    #[test]
    fn test_parse_response_empty_text() {
        let adapter = InferenceAdapter::default();
        let err = adapter
            .parse_response(&json!([{"generated_text": ""}]))
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponseStructure { .. }));
    }
}
