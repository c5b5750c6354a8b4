use super::openai_types::{ChatCompletionResponse, ChatMessage, ChatUsage, Choice, MessageContent};
use super::workers_types::{ResponsesResult, ResponsesUsage};

pub const THINK_OPEN: &str = "<think>";
pub const THINK_CLOSE: &str = "</think>";

/// Translate a Workers AI result into a single-choice Chat Completion response.
/// Pure function: anything missing from the result degrades to an empty string.
pub fn responses_to_chat(result: &ResponsesResult) -> ChatCompletionResponse {
    let (reasoning, answer) = extract_text(result);

    ChatCompletionResponse {
        id: result.id.clone(),
        object: "chat.completion".to_string(),
        created: result.created,
        model: result.model.clone(),
        choices: vec![Choice {
            index: 0,
            message: ChatMessage {
                role: "assistant".to_string(),
                content: MessageContent::Text(compose_content(reasoning, answer)),
            },
            finish_reason: "stop".to_string(),
        }],
        usage: map_usage(&result.usage),
    }
}

/// Pull the reasoning text and the assistant answer out of the output items.
/// Only `reasoning_text` parts of reasoning items and `output_text` parts of
/// assistant messages count; if several match, the last one wins.
pub fn extract_text(result: &ResponsesResult) -> (&str, &str) {
    let mut reasoning = "";
    let mut answer = "";

    for item in &result.output {
        match item.item_type.as_str() {
            "reasoning" => {
                for part in item.content.iter().filter(|c| c.content_type == "reasoning_text") {
                    reasoning = &part.text;
                }
            }
            "message" if item.role.as_deref() == Some("assistant") => {
                for part in item.content.iter().filter(|c| c.content_type == "output_text") {
                    answer = &part.text;
                }
            }
            _ => {}
        }
    }

    (reasoning, answer)
}

/// `<think>{reasoning}</think>\n{answer}`, or just the answer when there is no reasoning.
pub fn compose_content(reasoning: &str, answer: &str) -> String {
    if reasoning.is_empty() {
        return answer.to_string();
    }
    format!("{THINK_OPEN}{reasoning}{THINK_CLOSE}\n{answer}")
}

fn map_usage(usage: &ResponsesUsage) -> ChatUsage {
    ChatUsage {
        prompt_tokens: usage.prompt_tokens,
        completion_tokens: usage.completion_tokens,
        total_tokens: usage.total_tokens,
    }
}
