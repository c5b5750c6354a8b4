//! Type definitions for the Workers AI `responses` endpoint.
//!
//! The result types are lenient: every field defaults when the backend omits
//! it or sends `null`, so a sparse payload still decodes.

use serde::{Deserialize, Serialize};

use super::null_as_default;
use super::openai_types::MessageContent;

// ---------------------------------------------------------------------------
// Request types (what we send TO the backend)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsesRequest {
    pub model: String,
    pub input: Vec<InputMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputMessage {
    pub role: String,
    pub content: MessageContent,
}

// ---------------------------------------------------------------------------
// Result types (what the backend sends back)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponsesResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, rename = "created_at", deserialize_with = "null_as_default")]
    pub created: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub object: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub output: Vec<OutputItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub usage: ResponsesUsage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// `"reasoning"` or `"message"`.
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub item_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Vec<ContentItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentItem {
    /// `"reasoning_text"` inside reasoning items, `"output_text"` inside messages.
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub content_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ResponsesUsage {
    #[serde(default, alias = "input_tokens", deserialize_with = "null_as_default")]
    pub prompt_tokens: u64,
    #[serde(default, alias = "output_tokens", deserialize_with = "null_as_default")]
    pub completion_tokens: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_result() {
        let raw = r#"{
            "id": "resp_1",
            "created_at": 1700000000,
            "model": "@cf/openai/gpt-oss-120b",
            "object": "response",
            "output": [
                {"id": "rs_1", "type": "reasoning", "content": [{"type": "reasoning_text", "text": "think"}]},
                {"id": "msg_1", "type": "message", "role": "assistant", "status": "completed",
                 "content": [{"type": "output_text", "text": "answer", "annotations": []}]}
            ],
            "usage": {"prompt_tokens": 3, "completion_tokens": 5, "total_tokens": 8}
        }"#;

        let result: ResponsesResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.id, "resp_1");
        assert_eq!(result.created, 1_700_000_000);
        assert_eq!(result.output.len(), 2);
        assert_eq!(result.output[1].role.as_deref(), Some("assistant"));
        assert_eq!(result.output[1].content[0].text, "answer");
        assert_eq!(result.usage.total_tokens, 8);
    }

    #[test]
    fn test_decode_sparse_result() {
        let result: ResponsesResult = serde_json::from_str("{}").unwrap();
        assert!(result.id.is_empty());
        assert!(result.output.is_empty());
        assert_eq!(result.usage.prompt_tokens, 0);
    }

    #[test]
    fn test_decode_explicit_nulls() {
        let raw = r#"{
            "id": null,
            "created_at": null,
            "model": null,
            "object": null,
            "output": [
                {"id": null, "type": "reasoning", "content": null},
                {"type": null, "content": [{"type": "output_text", "text": null}]},
                {"type": "message", "role": "assistant",
                 "content": [{"type": "output_text", "text": "fine"}]}
            ],
            "usage": null
        }"#;

        let result: ResponsesResult = serde_json::from_str(raw).unwrap();
        assert!(result.id.is_empty());
        assert_eq!(result.created, 0);
        assert!(result.output[0].content.is_empty());
        assert!(result.output[1].item_type.is_empty());
        assert!(result.output[1].content[0].text.is_empty());
        assert_eq!(result.output[2].content[0].text, "fine");
        assert_eq!(result.usage.total_tokens, 0);

        let result: ResponsesResult = serde_json::from_str(r#"{"output": null}"#).unwrap();
        assert!(result.output.is_empty());

        let usage: ResponsesUsage =
            serde_json::from_str(r#"{"prompt_tokens": null, "total_tokens": 4}"#).unwrap();
        assert_eq!(usage.prompt_tokens, 0);
        assert_eq!(usage.total_tokens, 4);
    }

    #[test]
    fn test_usage_accepts_input_output_names() {
        let usage: ResponsesUsage =
            serde_json::from_str(r#"{"input_tokens": 4, "output_tokens": 6, "total_tokens": 10}"#)
                .unwrap();
        assert_eq!(usage.prompt_tokens, 4);
        assert_eq!(usage.completion_tokens, 6);
    }
}
