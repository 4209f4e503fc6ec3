/*
 * src/llm/embedder.rs
 *
 * File for the embedding adapter backing the semantic retrieval branch
 */

use async_trait::async_trait;
use langchain_rust::embedding::{openai::OpenAiEmbedder, Embedder as LangchainEmbedder};

use crate::error::{AppError, PrivateError};

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError>;
}

pub struct OpenAiTextEmbedder {
    inner: OpenAiEmbedder<langchain_rust::llm::openai::OpenAIConfig>,
}

impl OpenAiTextEmbedder {
    pub fn new() -> Self {
        OpenAiTextEmbedder {
            inner: OpenAiEmbedder::default(),
        }
    }
}

impl Default for OpenAiTextEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for OpenAiTextEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError> {
        let embedding = self
            .inner
            .embed_query(text)
            .await
            .map_err(|e| AppError::from(PrivateError::LlmBackend(e.to_string())))?;
        Ok(embedding.into_iter().map(|v| v as f32).collect())
    }
}

/// Deterministic hash-based embedding for tests and API-key-less runs;
/// not semantically meaningful, only stable and dimension-correct.
pub struct MockEmbedder {
    pub dimensions: usize,
}

impl Default for MockEmbedder {
    fn default() -> Self {
        MockEmbedder { dimensions: 16 }
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError> {
        let mut vector = vec![0.0f32; self.dimensions];
        for (i, byte) in text.bytes().enumerate() {
            vector[i % self.dimensions] += byte as f32 / 255.0;
        }
        Ok(vector)
    }
}
