/*
 * src/feedback/dsl.rs
 *
 * File for parsing a free-text revision into typed feedback operations
 */

use async_trait::async_trait;
use langchain_rust::language_models::llm::LLM;
use langchain_rust::llm::openai::{OpenAI, OpenAIModel};
use langchain_rust::schemas::Message;
use serde::Deserialize;

use crate::error::{AppError, PublicError};
use crate::models::feedback::FeedbackOp;

const SYSTEM_PROMPT: &str = r#"You convert a traveler's revision request on an existing itinerary into a
JSON array of operations, each one of:
{"op":"DROP","place_id":string}
{"op":"REPLACE","place_id":string,"hint_tags":[string]}
{"op":"MOVE","place_id":string,"target_day":integer,"new_time":"HH:MM"|null}
{"op":"INSERT","description":string,"preferred_day":integer|null}
{"op":"SWAP","place_id_a":string,"place_id_b":string}
{"op":"REORDER","day_index":integer}
Respond with the JSON array only."#;

#[async_trait]
pub trait FeedbackParser: Send + Sync {
    async fn parse(&self, utterance: &str) -> Result<Vec<FeedbackOp>, AppError>;
}

pub struct LlmFeedbackParser {
    llm: OpenAI<langchain_rust::llm::openai::OpenAIConfig>,
}

impl LlmFeedbackParser {
    pub fn new() -> Self {
        LlmFeedbackParser {
            llm: OpenAI::default().with_model(OpenAIModel::Gpt4oMini.to_string()),
        }
    }
}

impl Default for LlmFeedbackParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_hhmm(s: &str) -> Option<u32> {
    let (h, m) = s.split_once(':')?;
    Some(h.parse::<u32>().ok()? * 60 + m.parse::<u32>().ok()?)
}

fn strip_json_fence(raw: &str) -> &str {
    raw.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[async_trait]
impl FeedbackParser for LlmFeedbackParser {
    async fn parse(&self, utterance: &str) -> Result<Vec<FeedbackOp>, AppError> {
        let messages = vec![
            Message::new_system_message(SYSTEM_PROMPT),
            Message::new_human_message(utterance),
        ];
        let raw_reply = self
            .llm
            .generate(&messages)
            .await
            .map_err(|e| AppError::from(PublicError::ParseError(e.to_string())))?
            .generation;

        #[derive(Deserialize)]
        #[serde(tag = "op", rename_all = "UPPERCASE")]
        enum RawOp {
            Drop { place_id: String },
            Replace { place_id: String, hint_tags: Vec<String> },
            Move {
                place_id: String,
                target_day: u32,
                new_time: Option<String>,
            },
            Insert { description: String, preferred_day: Option<u32> },
            Swap { place_id_a: String, place_id_b: String },
            Reorder { day_index: u32 },
        }

        let raw_ops: Vec<RawOp> = serde_json::from_str(strip_json_fence(&raw_reply))
            .map_err(|e| AppError::from(PublicError::ParseError(e.to_string())))?;

        Ok(raw_ops
            .into_iter()
            .map(|op| match op {
                RawOp::Drop { place_id } => FeedbackOp::Drop { place_id },
                RawOp::Replace { place_id, hint_tags } => FeedbackOp::Replace { place_id, hint_tags },
                RawOp::Move { place_id, target_day, new_time } => FeedbackOp::Move {
                    place_id,
                    target_day,
                    new_time_minute: new_time.and_then(|s| parse_hhmm(&s)),
                },
                RawOp::Insert { description, preferred_day } => {
                    FeedbackOp::Insert { description, preferred_day }
                }
                RawOp::Swap { place_id_a, place_id_b } => FeedbackOp::Swap { place_id_a, place_id_b },
                RawOp::Reorder { day_index } => FeedbackOp::Reorder { day_index },
            })
            .collect())
    }
}

/// Deterministic stand-in used when `DEPLOY_LLM` is unset. Recognizes the
/// literal verbs "drop" and "reorder" followed by an argument; anything
/// else is treated as an unrecognized revision.
pub struct MockFeedbackParser;

#[async_trait]
impl FeedbackParser for MockFeedbackParser {
    async fn parse(&self, utterance: &str) -> Result<Vec<FeedbackOp>, AppError> {
        let lower = utterance.to_lowercase();
        if let Some(rest) = lower.strip_prefix("drop ") {
            return Ok(vec![FeedbackOp::Drop {
                place_id: rest.trim().to_string(),
            }]);
        }
        if let Some(rest) = lower.strip_prefix("reorder day ") {
            let day_index = rest.trim().parse().unwrap_or(0);
            return Ok(vec![FeedbackOp::Reorder { day_index }]);
        }
        Err(AppError::from(PublicError::ParseError(
            "could not understand revision request".to_string(),
        )))
    }
}
