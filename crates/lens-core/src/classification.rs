//! Waste-sorting classification parsed from provider content.
//!
//! Providers are asked (via `CLASSIFY_PROMPT`) to answer with a JSON object
//! holding an `items` array. Models often wrap that JSON in a Markdown fence,
//! so parsing strips one first.

use crate::error::ClassificationError;
use crate::provider::adapter::strip_markdown_fence;
use serde::{Deserialize, Serialize};

/// Default prompt asking for a structured waste-sorting answer.
pub const CLASSIFY_PROMPT: &str = r#"Analyze the item(s) in the image for waste sorting purposes based on common recycling rules (consider US, German, Italian, Brazilian variations if possible, but prioritize general rules). Identify the primary item(s). For each item identified, provide:
1.  `itemName`: A concise name for the item (e.g., "Plastic Bottle", "Aluminum Can").
2.  `primaryBin`: The most likely disposal bin type ('recyclable', 'organic', 'general-waste', 'hazardous').
3.  `primaryConfidence`: Confidence score (0.0 to 1.0) for the primaryBin.
4.  `secondaryBin`: Next likely bin type.
5.  `secondaryConfidence`: Confidence score (0.0 to 1.0) for secondaryBin.
6.  `material`: Specific material if identifiable (e.g., 'PET', 'Aluminum', 'Paper', 'Glass', 'Plastic').
7.  `reasoning`: Brief explanation for the primaryBin choice.
8.  `isContaminated`: Boolean (true/false) indicating likely contamination (e.g., food residue).
9.  `position`: Approximate position in image (e.g., 'center', 'top-left').

Return the response ONLY as a valid JSON object containing a list called "items".
If you cannot confidently identify any item suitable for sorting, return a single item with "itemName": "Identification Failed", "primaryBin": "error", "primaryConfidence": 0.0 and a short "reasoning".
Do not include any text before or after the JSON object."#;

/// Disposal bin categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bin {
    Recyclable,
    Organic,
    GeneralWaste,
    Hazardous,
    /// Sentinel for "could not identify anything"
    Error,
}

/// One identified item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedItem {
    pub item_name: String,
    pub primary_bin: Bin,
    #[serde(default)]
    pub primary_confidence: f32,
    #[serde(default)]
    pub secondary_bin: Option<Bin>,
    #[serde(default)]
    pub secondary_confidence: f32,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub is_contaminated: bool,
    #[serde(default)]
    pub position: Option<String>,
}

/// Parsed classification document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub items: Vec<ClassifiedItem>,
}

#[derive(Deserialize)]
struct RawClassification {
    items: Option<Vec<ClassifiedItem>>,
}

impl Classification {
    /// Parse provider content, tolerating a surrounding Markdown fence.
    pub fn parse(content: &str) -> Result<Self, ClassificationError> {
        let cleaned = strip_markdown_fence(content.trim());
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return Err(ClassificationError::Empty);
        }

        let raw: RawClassification = serde_json::from_str(cleaned)?;
        let items = raw.items.ok_or(ClassificationError::MissingItems)?;
        Ok(Self { items })
    }

    /// The first item, which callers treat as the headline answer.
    pub fn primary(&self) -> Option<&ClassifiedItem> {
        self.items.first()
    }

    /// Whether the model reported that it could not identify anything.
    pub fn is_identification_failure(&self) -> bool {
        self.items.is_empty() || self.items.iter().all(|item| item.primary_bin == Bin::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAN: &str = r#"{
        "items": [{
            "itemName": "Aluminum Can",
            "primaryBin": "recyclable",
            "primaryConfidence": 0.98,
            "secondaryBin": "general-waste",
            "secondaryConfidence": 0.02,
            "material": "Aluminum",
            "reasoning": "Clean aluminum can, typically recyclable.",
            "isContaminated": false,
            "position": "center"
        }]
    }"#;

    #[test]
    fn test_parse_plain_json() {
        let classification = Classification::parse(CAN).unwrap();
        let item = classification.primary().unwrap();
        assert_eq!(item.item_name, "Aluminum Can");
        assert_eq!(item.primary_bin, Bin::Recyclable);
        assert_eq!(item.secondary_bin, Some(Bin::GeneralWaste));
        assert!(!classification.is_identification_failure());
    }

    #[test]
    fn test_parse_fenced_json() {
        let fenced = format!("```json\n{CAN}\n```");
        let classification = Classification::parse(&fenced).unwrap();
        assert_eq!(classification.items.len(), 1);
    }

    #[test]
    fn test_parse_identification_failure() {
        let content = r#"{"items": [{"itemName": "Identification Failed", "primaryBin": "error",
            "primaryConfidence": 0.0, "secondaryBin": null, "reasoning": "blurry"}]}"#;
        let classification = Classification::parse(content).unwrap();
        assert!(classification.is_identification_failure());
    }

    #[test]
    fn test_parse_missing_items() {
        let err = Classification::parse(r#"{"result": []}"#).unwrap_err();
        assert!(matches!(err, ClassificationError::MissingItems));
    }

    #[test]
    fn test_parse_empty_content() {
        let err = Classification::parse("```json\n```").unwrap_err();
        assert!(matches!(err, ClassificationError::Empty));
    }

    #[test]
    fn test_parse_not_json() {
        let err = Classification::parse("It looks like a bottle.").unwrap_err();
        assert!(matches!(err, ClassificationError::Json(_)));
    }
}
