use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Content;

/// One response, or one chunk of a streamed response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates.  Streams usually carry exactly one.
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Present when the prompt itself was filtered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,

    /// Token accounting.  In a stream, later chunks supersede earlier ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,

    /// The concrete model version that served the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

/// A single generated candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The generated content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,

    /// Why generation stopped; absent on intermediate chunks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,

    /// Candidate index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    FinishReasonUnspecified,
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    Language,
    Other,
    Blocklist,
    ProhibitedContent,
    Spii,
    MalformedFunctionCall,
    #[serde(other)]
    Unknown,
}

impl FinishReason {
    /// Returns true if the candidate was cut off by a content filter.
    pub fn is_filtered(&self) -> bool {
        matches!(
            self,
            FinishReason::Safety
                | FinishReason::Recitation
                | FinishReason::Blocklist
                | FinishReason::ProhibitedContent
                | FinishReason::Spii
        )
    }
}

/// Feedback about the prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was blocked; the value names the filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

/// Token counts for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

impl GenerateContentResponse {
    /// The text of the first candidate.
    ///
    /// Returns an empty string for chunks that carry no candidate text (usage-only trailers, for
    /// instance).  Returns [`Error::Blocked`] when the prompt was blocked or the candidate was
    /// stopped by a content filter before producing any text.
    pub fn text(&self) -> Result<String> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_ref())
        {
            return Err(Error::blocked(format!("prompt blocked: {reason}")));
        }
        let Some(candidate) = self.candidates.first() else {
            return Ok(String::new());
        };
        let has_text = candidate
            .content
            .as_ref()
            .is_some_and(|content| content.has_text());
        if let Some(reason) = candidate.finish_reason
            && reason.is_filtered()
            && !has_text
        {
            return Err(Error::blocked(format!("response stopped: {reason:?}")));
        }
        Ok(candidate
            .content
            .as_ref()
            .map(Content::joined_text)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_stream_chunk() {
        let json = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "Hi"}], "role": "model"},
                "index": 0
            }],
            "usageMetadata": {"promptTokenCount": 4, "totalTokenCount": 4},
            "modelVersion": "gemini-2.5-flash"
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text().unwrap(), "Hi");
        assert_eq!(response.usage_metadata.unwrap().prompt_token_count, 4);
        assert_eq!(response.model_version.as_deref(), Some("gemini-2.5-flash"));
    }

    #[test]
    fn usage_only_chunk_has_empty_text() {
        let json = r#"{"usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 9, "totalTokenCount": 13}}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text().unwrap(), "");
    }

    #[test]
    fn blocked_prompt() {
        let json = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert!(response.text().unwrap_err().is_blocked());
    }

    #[test]
    fn filtered_candidate_without_text() {
        let json = r#"{"candidates": [{"finishReason": "RECITATION", "index": 0}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert!(response.text().unwrap_err().is_blocked());
    }

    #[test]
    fn stop_with_final_text() {
        let json = r#"{"candidates": [{"content": {"parts": [{"text": "!"}], "role": "model"}, "finishReason": "STOP"}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text().unwrap(), "!");
    }

    #[test]
    fn unknown_finish_reason() {
        let reason: FinishReason = serde_json::from_str(r#""IMAGE_SAFETY_V9""#).unwrap();
        assert_eq!(reason, FinishReason::Unknown);
    }
}
