/*
 * src/state.rs
 *
 * File for the shared application state injected into axum handlers
 *
 * Purpose:
 *   Constructed once at startup and passed in via `Extension`, the way
 *   this codebase passes its database pool: one `Arc<AppState>` shared
 *   across every request, no per-request global lookups.
 */

use sqlx::PgPool;
use std::sync::Arc;

use crate::catalog::{CatalogRepository, VectorIndex};
use crate::config::PlannerConfig;
use crate::feedback::FeedbackParser;
use crate::llm::embedder::Embedder;
use crate::llm::extractor::StoryExtractor;
use crate::llm::generator::ReplyGenerator;
use crate::travel_time::TravelTimeOracle;

pub struct AppState {
    pub pool: PgPool,
    pub catalog: Arc<dyn CatalogRepository>,
    pub vector_index: Arc<dyn VectorIndex>,
    pub embedder: Arc<dyn Embedder>,
    pub extractor: Arc<dyn StoryExtractor>,
    pub generator: Arc<dyn ReplyGenerator>,
    pub feedback_parser: Arc<dyn FeedbackParser>,
    pub oracle: Arc<TravelTimeOracle>,
    pub config: Arc<PlannerConfig>,
}
