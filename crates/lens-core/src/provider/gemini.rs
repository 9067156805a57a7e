//! Google Gemini `generateContent` adapter.
//!
//! The model is addressed by the endpoint URL, so the body carries only the
//! prompt and the inline image.

use super::adapter::{
    invalid_structure, require_body, require_inputs, split_data_url, strip_markdown_fence,
    Adapter, ParsedContent, DEFAULT_MEDIA_TYPE,
};
use crate::error::{ProviderError, ProviderResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gemini-family adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeminiAdapter;

// --- Request types ---

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

// --- Response types ---

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl Adapter for GeminiAdapter {
    fn label(&self) -> &str {
        "Gemini"
    }

    fn format_request(&self, prompt: &str, image: &str) -> ProviderResult<Value> {
        require_inputs(prompt, image)?;
        let (media_type, data) = split_data_url(image);

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: prompt },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: media_type.unwrap_or(DEFAULT_MEDIA_TYPE),
                            data,
                        },
                    },
                ],
            }],
        };

        serde_json::to_value(body)
            .map_err(|e| ProviderError::InvalidArgument(format!("Failed to encode request: {e}")))
    }

    fn parse_response(&self, body: &Value) -> ProviderResult<ParsedContent> {
        require_body(self.label(), body)?;

        let response = GenerateContentResponse::deserialize(body)
            .map_err(|e| invalid_structure(self.label(), &e.to_string()))?;

        let candidate = response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .ok_or_else(|| invalid_structure(self.label(), "missing candidates[0]"))?;

        let text = candidate
            .content
            .as_ref()
            .and_then(|c| c.parts.as_ref())
            .and_then(|parts| parts.first())
            .and_then(|part| part.text.as_deref())
            .ok_or_else(|| {
                invalid_structure(self.label(), "missing candidates[0].content.parts[0].text")
            })?;

        Ok(ParsedContent {
            content: strip_markdown_fence(text),
        })
    }
}
