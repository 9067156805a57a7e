//! Canonical request and result types shared by every provider.

use crate::error::AnalyzeError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Provider-agnostic analysis request.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    /// Instruction text for the model
    pub prompt: String,
    /// Base64 image, optionally as a `data:` URL
    pub image: String,
}

impl AnalyzeRequest {
    /// Validate and build a request. Both fields must be non-blank.
    pub fn new(prompt: &str, image: &str) -> Result<Self, AnalyzeError> {
        if prompt.trim().is_empty() {
            return Err(AnalyzeError::InvalidRequest("prompt is empty".into()));
        }
        if image.trim().is_empty() {
            return Err(AnalyzeError::InvalidRequest("image data is empty".into()));
        }
        Ok(Self {
            prompt: prompt.to_string(),
            image: image.to_string(),
        })
    }
}

/// Successful analysis from the first provider that answered.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Text content extracted by the provider's adapter
    pub content: String,
    /// Name of the provider that produced the content
    pub provider_name: String,
    /// When the result was produced
    pub timestamp: DateTime<Utc>,
    /// Duration of the successful attempt
    pub elapsed_ms: u64,
    /// 1-based attempt number against that provider
    pub attempt_number: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_rejects_blank_fields() {
        assert!(matches!(
            AnalyzeRequest::new("  ", "QUJD"),
            Err(AnalyzeError::InvalidRequest(_))
        ));
        assert!(matches!(
            AnalyzeRequest::new("identify item", ""),
            Err(AnalyzeError::InvalidRequest(_))
        ));
        assert!(AnalyzeRequest::new("identify item", "QUJD").is_ok());
    }
}
