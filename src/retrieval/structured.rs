/*
 * src/retrieval/structured.rs
 *
 * File for the structured retrieval branch
 *
 * Purpose:
 *   Spatial + attribute filter against the Catalog Repository, returning
 *   candidates with only the structured signal populated.
 */

use crate::catalog::{CatalogRepository, PlaceFilter};
use crate::error::AppError;
use crate::models::candidate::Candidate;
use crate::models::story::Story;

/// Default search radius around the story's anchor point, in meters.
const DEFAULT_RADIUS_M: f64 = 15_000.0;

pub async fn retrieve_structured(
    story: &Story,
    catalog: &dyn CatalogRepository,
    limit: usize,
) -> Result<Vec<Candidate>, AppError> {
    let filter = PlaceFilter {
        tags: story.interests.clone(),
        ..Default::default()
    };

    let places = catalog
        .find_places(story.anchor, DEFAULT_RADIUS_M, &filter, limit)
        .await?;

    let candidates = places
        .into_iter()
        .map(|place| {
            let distance = place.point.distance_meters(&story.anchor);
            let mut candidate = Candidate::new(place, distance);
            candidate.structured_score = Some(structured_score(&candidate, distance));
            candidate
        })
        .collect();

    Ok(candidates)
}

fn structured_score(candidate: &Candidate, distance_m: f64) -> f64 {
    let rating = candidate.place.rating.map(|r| r as f64 / 5.0).unwrap_or(0.3);
    let distance_score = (1.0 - distance_m / DEFAULT_RADIUS_M).clamp(0.0, 1.0);
    0.5 * rating + 0.5 * distance_score
}
