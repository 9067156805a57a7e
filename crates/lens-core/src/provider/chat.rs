//! Chat Completions adapter for OpenAI-compatible providers.
//!
//! Sends the prompt and image as a two-part user message; the image travels
//! as a JPEG data URL. Used for Pollinations and OpenRouter.

use super::adapter::{
    invalid_structure, require_body, require_inputs, strip_data_url, strip_markdown_fence,
    Adapter, ParsedContent,
};
use crate::error::{ProviderError, ProviderResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// OpenAI-compatible chat adapter.
#[derive(Debug, Clone)]
pub struct ChatAdapter {
    label: String,
    model: String,
    max_tokens: Option<u32>,
}

impl ChatAdapter {
    pub fn new(label: &str, model: &str) -> Self {
        Self {
            label: label.to_string(),
            model: model.to_string(),
            max_tokens: None,
        }
    }

    /// Cap the completion length sent as `max_tokens`.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Vec<ChatContent<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent<'a> {
    #[serde(rename = "text")]
    Text { text: &'a str },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl Adapter for ChatAdapter {
    fn label(&self) -> &str {
        &self.label
    }

    fn format_request(&self, prompt: &str, image: &str) -> ProviderResult<Value> {
        require_inputs(prompt, image)?;

        let body = ChatRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ChatContent::Text { text: prompt },
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: format!("data:image/jpeg;base64,{}", strip_data_url(image)),
                        },
                    },
                ],
            }],
        };

        serde_json::to_value(body)
            .map_err(|e| ProviderError::InvalidArgument(format!("Failed to encode request: {e}")))
    }

    fn parse_response(&self, body: &Value) -> ProviderResult<ParsedContent> {
        require_body(&self.label, body)?;

        let response = ChatResponse::deserialize(body)
            .map_err(|e| invalid_structure(&self.label, &e.to_string()))?;

        let content = response
            .choices
            .as_ref()
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
            .ok_or_else(|| invalid_structure(&self.label, "missing choices[0].message.content"))?;

        Ok(ParsedContent {
            content: strip_markdown_fence(content),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_request_shape() {
        let adapter = ChatAdapter::new("Pollinations", "gemini").with_max_tokens(1000);
        let body = adapter
            .format_request("identify item", "data:image/png;base64,QUJD")
            .unwrap();

        assert_eq!(
            body,
            json!({
                "model": "gemini",
                "messages": [{
                    "role": "user",
                    "content": [
                        {"type": "text", "text": "identify item"},
                        {"type": "image_url", "image_url": {"url": "data:image/jpeg;base64,QUJD"}}
                    ]
                }],
                "max_tokens": 1000
            })
        );
    }

    #[test]
    fn test_format_request_omits_max_tokens_when_unset() {
        let adapter = ChatAdapter::new("OpenRouter", "allenai/molmo-2-8b:free");
        let body = adapter.format_request("identify item", "QUJD").unwrap();
        assert!(body.get("max_tokens").is_none());
        assert_eq!(body["model"], "allenai/molmo-2-8b:free");
    }

    #[test]
    fn test_format_request_rejects_empty_prompt() {
        let adapter = ChatAdapter::new("OpenRouter", "m");
        let err = adapter.format_request("", "QUJD").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidArgument(_)));
    }

    #[test]
    fn test_parse_response_valid() {
        let adapter = ChatAdapter::new("Pollinations", "gemini");
        let parsed = adapter
            .parse_response(&json!({"choices": [{"message": {"content": "a plastic bottle"}}]}))
            .unwrap();
        assert_eq!(parsed.content, "a plastic bottle");
    }

    #[test]
    fn test_parse_response_strips_fence() {
        let adapter = ChatAdapter::new("OpenRouter", "m");
        let parsed = adapter
            .parse_response(&json!({
                "choices": [{"message": {"content": "```json\n{\"items\":[]}\n```"}}]
            }))
            .unwrap();
        assert_eq!(parsed.content, "{\"items\":[]}");
    }

    #[test]
    fn test_parse_response_missing_choices() {
        let adapter = ChatAdapter::new("OpenRouter", "m");
        let err = adapter.parse_response(&json!({"id": "x"})).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponseStructure { .. }));
        assert!(err.to_string().contains("OpenRouter"));
    }

    #[test]
    fn test_parse_response_empty_choices() {
        let adapter = ChatAdapter::new("OpenRouter", "m");
        let err = adapter.parse_response(&json!({"choices": []})).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponseStructure { .. }));
    }

    #[test]
    fn test_parse_response_null_body() {
        let adapter = ChatAdapter::new("OpenRouter", "m");
        let err = adapter.parse_response(&Value::Null).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponseStructure { .. }));
    }
}
