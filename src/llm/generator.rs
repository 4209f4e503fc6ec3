/*
 * src/llm/generator.rs
 *
 * File for the user-facing reply generator
 *
 * Purpose:
 *   Turn a computed Itinerary (or a repair-ladder decision point) into a
 *   short natural-language reply. Gated behind DEPLOY_LLM the same way
 *   the chat controller in this codebase gates real agent calls versus a
 *   canned response, so the service is runnable without a live API key.
 */

use async_trait::async_trait;
use langchain_rust::language_models::llm::LLM;
use langchain_rust::llm::openai::{OpenAI, OpenAIModel};
use langchain_rust::schemas::Message;

use crate::error::{AppError, PrivateError};
use crate::models::itinerary::Itinerary;

#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    async fn present(&self, itinerary: &Itinerary) -> Result<String, AppError>;
    async fn clarify(&self, reason: &str) -> Result<String, AppError>;
}

pub struct LlmReplyGenerator {
    llm: OpenAI<langchain_rust::llm::openai::OpenAIConfig>,
}

impl LlmReplyGenerator {
    pub fn new() -> Self {
        LlmReplyGenerator {
            llm: OpenAI::default().with_model(OpenAIModel::Gpt4oMini.to_string()),
        }
    }
}

impl Default for LlmReplyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReplyGenerator for LlmReplyGenerator {
    async fn present(&self, itinerary: &Itinerary) -> Result<String, AppError> {
        let summary = serde_json::to_string(itinerary)
            .map_err(|e| AppError::from(PrivateError::Serialization(e)))?;
        let messages = vec![
            Message::new_system_message(
                "Summarize this itinerary for the traveler in two or three warm, concise sentences.",
            ),
            Message::new_human_message(summary),
        ];
        self.llm
            .generate(&messages)
            .await
            .map(|r| r.generation)
            .map_err(|e| AppError::from(PrivateError::LlmBackend(e.to_string())))
    }

    async fn clarify(&self, reason: &str) -> Result<String, AppError> {
        let messages = vec![
            Message::new_system_message(
                "Ask the traveler a brief clarifying question given this planning problem.",
            ),
            Message::new_human_message(reason.to_string()),
        ];
        self.llm
            .generate(&messages)
            .await
            .map(|r| r.generation)
            .map_err(|e| AppError::from(PrivateError::LlmBackend(e.to_string())))
    }
}

/// Canned responses used when `DEPLOY_LLM` is unset, matching the dummy
/// response path in this codebase's chat handling.
pub struct MockReplyGenerator;

#[async_trait]
impl ReplyGenerator for MockReplyGenerator {
    async fn present(&self, itinerary: &Itinerary) -> Result<String, AppError> {
        let visit_count: usize = itinerary.days.iter().map(|d| d.visits.len()).sum();
        Ok(format!(
            "Here's a {}-day plan with {} stops.",
            itinerary.days.len(),
            visit_count
        ))
    }

    async fn clarify(&self, reason: &str) -> Result<String, AppError> {
        Ok(format!("I ran into an issue: {reason}. Could you clarify?"))
    }
}
