//! Translate OpenAI Chat Completions requests into Workers AI `responses` requests.

use super::openai_types::ChatCompletionRequest;
use super::workers_types::{InputMessage, ResponsesRequest};

/// Translate a chat request into a backend request for `model`.
/// Pure function: the client's own `model` field is ignored, message order and
/// content are carried over verbatim, and sampling options only when set.
pub fn chat_to_responses(req: &ChatCompletionRequest, model: &str) -> ResponsesRequest {
    let input = req
        .messages
        .iter()
        .map(|msg| InputMessage {
            role: msg.role.clone(),
            content: msg.content.clone(),
        })
        .collect();

    ResponsesRequest {
        model: model.to_string(),
        input,
        temperature: req.temperature,
        top_p: req.top_p,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::openai_types::{ChatMessage, MessageContent};
    use serde_json::json;

    fn request(model: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: MessageContent::Text("be brief".to_string()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: MessageContent::Structured(json!([
                        {"type": "text", "text": "describe"},
                        {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}}
                    ])),
                },
            ],
            stream: false,
            temperature: None,
            top_p: None,
        }
    }

    #[test]
    fn test_client_model_is_ignored() {
        let out = chat_to_responses(&request("gpt-4o"), "@cf/openai/gpt-oss-120b");
        assert_eq!(out.model, "@cf/openai/gpt-oss-120b");

        let out = chat_to_responses(&request(""), "@cf/meta/llama");
        assert_eq!(out.model, "@cf/meta/llama");
    }

    #[test]
    fn test_messages_carried_verbatim() {
        let req = request("x");
        let out = chat_to_responses(&req, "m");

        assert_eq!(out.input.len(), 2);
        for (input, msg) in out.input.iter().zip(&req.messages) {
            assert_eq!(input.role, msg.role);
            assert_eq!(input.content, msg.content);
        }

        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["input"][0]["content"], "be brief");
        assert_eq!(value["input"][1]["content"][1]["type"], "image_url");
    }

    #[test]
    fn test_absent_sampling_options_are_omitted() {
        let value = serde_json::to_value(chat_to_responses(&request("x"), "m")).unwrap();
        assert!(value.get("temperature").is_none());
        assert!(value.get("top_p").is_none());
    }

    #[test]
    fn test_sampling_options_forwarded() {
        let mut req = request("x");
        req.temperature = Some(0.0);
        req.top_p = Some(0.9);

        let value = serde_json::to_value(chat_to_responses(&req, "m")).unwrap();
        assert_eq!(value["temperature"], 0.0);
        assert_eq!(value["top_p"], 0.9);
    }
}
