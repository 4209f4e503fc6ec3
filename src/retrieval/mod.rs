/*
 * src/retrieval/mod.rs
 *
 * File for the Hybrid Retriever
 *
 * Purpose:
 *   Runs the structured and semantic branches concurrently, each under its
 *   own timeout, and fuses their results before handing off to the
 *   reranker.
 */

pub mod fuse;
pub mod rerank;
pub mod semantic;
pub mod structured;

use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::catalog::{CatalogRepository, VectorIndex};
use crate::config::PlannerConfig;
use crate::llm::embedder::Embedder;
use crate::models::candidate::Candidate;
use crate::models::story::Story;

pub struct RetrievalOutcome {
    pub structured: Vec<Candidate>,
    pub semantic: Vec<Candidate>,
    pub structured_degraded: bool,
    pub semantic_degraded: bool,
}

pub async fn retrieve(
    story: &Story,
    catalog: &Arc<dyn CatalogRepository>,
    vector_index: &Arc<dyn VectorIndex>,
    embedder: &Arc<dyn Embedder>,
    config: &PlannerConfig,
) -> RetrievalOutcome {
    let branch_timeout = Duration::from_millis(config.retrieval.branch_timeout_ms);

    let structured_fut = tokio::time::timeout(
        branch_timeout,
        structured::retrieve_structured(story, catalog.as_ref(), config.retrieval.structured_limit),
    );
    let semantic_fut = tokio::time::timeout(
        branch_timeout,
        semantic::retrieve_semantic(
            story,
            vector_index.as_ref(),
            embedder.as_ref(),
            catalog.as_ref(),
            config.retrieval.semantic_limit,
        ),
    );

    let (structured_res, semantic_res) = tokio::join!(structured_fut, semantic_fut);

    let (structured, structured_degraded) = match structured_res {
        Ok(Ok(candidates)) => (candidates, false),
        Ok(Err(e)) => {
            warn!("WARN ->> structured retrieval failed: {e}");
            (Vec::new(), true)
        }
        Err(_) => {
            warn!("WARN ->> structured retrieval timed out");
            (Vec::new(), true)
        }
    };

    let (semantic, semantic_degraded) = match semantic_res {
        Ok(Ok(candidates)) => (candidates, false),
        Ok(Err(e)) => {
            warn!("WARN ->> semantic retrieval failed: {e}");
            (Vec::new(), true)
        }
        Err(_) => {
            warn!("WARN ->> semantic retrieval timed out");
            (Vec::new(), true)
        }
    };

    RetrievalOutcome {
        structured,
        semantic,
        structured_degraded,
        semantic_degraded,
    }
}
