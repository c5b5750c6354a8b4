//! Replays a finished Chat Completion response as a stream of chunks.
//!
//! The backend only ever returns a complete answer, so the [`ChunkEmitter`]
//! walks that answer one character at a time and produces the same frame
//! sequence a live OpenAI stream would: a role announcement, one content delta
//! per character, a final chunk carrying `finish_reason` and usage, then the
//! `[DONE]` sentinel.

use chrono::Utc;

use super::openai_types::{
    ChatCompletionChunk, ChatCompletionResponse, ChatUsage, ChunkChoice, ChunkDelta,
};

pub const DONE_SENTINEL: &str = "[DONE]";

/// One unit of the simulated stream.
#[derive(Debug, Clone)]
pub enum Frame {
    Chunk(ChatCompletionChunk),
    Done,
}

impl Frame {
    /// The SSE `data:` payload for this frame.
    pub fn data(&self) -> serde_json::Result<String> {
        match self {
            Self::Chunk(chunk) => serde_json::to_string(chunk),
            Self::Done => Ok(DONE_SENTINEL.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    Content,
    End,
    Sentinel,
    Finished,
}

/// Finite, single-pass producer of [`Frame`]s for one response.
///
/// Usage:
///   let emitter = ChunkEmitter::new(&response);
///   for frame in emitter {
///       // write frame.data() as an SSE event and flush
///   }
#[derive(Debug)]
pub struct ChunkEmitter {
    id: String,
    model: String,
    usage: ChatUsage,
    text: String,
    cursor: usize,
    remaining_chars: usize,
    phase: Phase,
}

impl ChunkEmitter {
    pub fn new(resp: &ChatCompletionResponse) -> Self {
        let text = resp.content().to_string();
        Self {
            id: resp.id.clone(),
            model: resp.model.clone(),
            usage: resp.usage,
            remaining_chars: text.chars().count(),
            text,
            cursor: 0,
            phase: Phase::Start,
        }
    }

    fn chunk(
        &self,
        delta: ChunkDelta,
        finish_reason: Option<String>,
        usage: Option<ChatUsage>,
    ) -> Frame {
        Frame::Chunk(ChatCompletionChunk {
            id: self.id.clone(),
            object: "chat.completion.chunk".to_string(),
            created: Utc::now().timestamp(),
            model: self.model.clone(),
            choices: vec![ChunkChoice {
                index: 0,
                delta,
                finish_reason,
            }],
            usage,
        })
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.text[self.cursor..].chars().next()?;
        self.cursor += ch.len_utf8();
        self.remaining_chars -= 1;
        Some(ch)
    }
}

impl Iterator for ChunkEmitter {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        loop {
            match self.phase {
                Phase::Start => {
                    self.phase = Phase::Content;
                    let delta = ChunkDelta {
                        role: Some("assistant".to_string()),
                        content: None,
                    };
                    return Some(self.chunk(delta, None, None));
                }
                Phase::Content => match self.next_char() {
                    Some(ch) => {
                        let delta = ChunkDelta {
                            role: None,
                            content: Some(ch.to_string()),
                        };
                        return Some(self.chunk(delta, None, None));
                    }
                    None => self.phase = Phase::End,
                },
                Phase::End => {
                    self.phase = Phase::Sentinel;
                    let finish_reason = Some("stop".to_string());
                    let usage = Some(self.usage);
                    return Some(self.chunk(ChunkDelta::default(), finish_reason, usage));
                }
                Phase::Sentinel => {
                    self.phase = Phase::Finished;
                    return Some(Frame::Done);
                }
                Phase::Finished => return None,
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = match self.phase {
            Phase::Start => self.remaining_chars + 3,
            Phase::Content => self.remaining_chars + 2,
            Phase::End => 2,
            Phase::Sentinel => 1,
            Phase::Finished => 0,
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for ChunkEmitter {}

impl std::iter::FusedIterator for ChunkEmitter {}
