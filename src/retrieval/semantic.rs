/*
 * src/retrieval/semantic.rs
 *
 * File for the semantic retrieval branch
 *
 * Purpose:
 *   Embed a story projection and query the Vector Index; candidates come
 *   back as (place id, similarity) and are hydrated against the catalog
 *   before scoring.
 */

use crate::catalog::{CatalogRepository, VectorIndex};
use crate::error::AppError;
use crate::llm::embedder::Embedder;
use crate::models::candidate::Candidate;
use crate::models::story::Story;

fn story_projection(story: &Story) -> String {
    format!(
        "{} trip, {:?} pace, interests: {}",
        story.destination,
        story.pace,
        story.interests.join(", ")
    )
}

pub async fn retrieve_semantic(
    story: &Story,
    vector_index: &dyn VectorIndex,
    embedder: &dyn Embedder,
    catalog: &dyn CatalogRepository,
    limit: usize,
) -> Result<Vec<Candidate>, AppError> {
    let text = story_projection(story);
    let query_vector = embedder.embed(&text).await?;
    let matches = vector_index.search(&query_vector, limit).await?;

    if matches.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<String> = matches.iter().map(|(id, _)| id.clone()).collect();
    let places = catalog.get_places_by_id(&ids).await?;
    let place_by_id: std::collections::HashMap<_, _> =
        places.into_iter().map(|p| (p.id.clone(), p)).collect();

    let candidates = matches
        .into_iter()
        .filter_map(|(id, similarity)| {
            let place = place_by_id.get(&id)?.clone();
            let distance = place.point.distance_meters(&story.anchor);
            let mut candidate = Candidate::new(place, distance);
            candidate.semantic_score = Some(similarity);
            Some(candidate)
        })
        .collect();

    Ok(candidates)
}
