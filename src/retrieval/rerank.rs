/*
 * src/retrieval/rerank.rs
 *
 * File for the Reranker
 *
 * Purpose:
 *   Deterministic weighted scoring over fused candidates, with a stable
 *   tie-break so identical inputs always produce identical output order.
 */

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::config::RerankWeights;
use crate::models::candidate::Candidate;
use crate::models::story::{ConstraintTerm, Pace, Story};

const DEFAULT_SEARCH_RADIUS_M: f64 = 15_000.0;

fn term_matches(term: &ConstraintTerm, candidate: &Candidate) -> bool {
    match term {
        ConstraintTerm::PlaceId(id) => &candidate.place.id == id,
        ConstraintTerm::Name(name) => candidate.place.name.eq_ignore_ascii_case(name),
        ConstraintTerm::Tag(tag) => candidate
            .place
            .tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(tag)),
    }
}

fn pace_fit(candidate: &Candidate, pace: Pace) -> f64 {
    match pace {
        Pace::Relaxed => {
            let rating = candidate.place.rating.unwrap_or(3.5) as f64 / 5.0;
            let stay_bonus = (candidate.place.default_stay_minutes as f64 / 180.0).min(1.0);
            0.5 * rating + 0.5 * stay_bonus
        }
        Pace::Moderate => 0.5,
        Pace::Intensive => {
            let compact = (1.0 - candidate.place.default_stay_minutes as f64 / 240.0).clamp(0.0, 1.0);
            let tag_density = (candidate.place.tags.len() as f64 / 5.0).min(1.0);
            0.5 * compact + 0.5 * tag_density
        }
    }
}

fn tag_overlap(candidate: &Candidate, interests: &[String]) -> f64 {
    if interests.is_empty() {
        return 0.0;
    }
    let interest_set: HashSet<&str> = interests.iter().map(|s| s.as_str()).collect();
    let overlap = candidate
        .place
        .tags
        .iter()
        .filter(|t| interest_set.contains(t.as_str()))
        .count();
    overlap as f64 / interests.len() as f64
}

fn score_one(candidate: &Candidate, story: &Story, weights: &RerankWeights) -> f64 {
    let semantic = candidate.semantic_score.unwrap_or(0.0);
    let rating_norm = candidate.place.rating.map(|r| r as f64 / 5.0).unwrap_or(0.3);
    let distance_score = (1.0 - candidate.distance_meters / DEFAULT_SEARCH_RADIUS_M).clamp(0.0, 1.0);
    let overlap = tag_overlap(candidate, &story.interests);
    let pace = pace_fit(candidate, story.pace);

    let must_have_bonus = if story.must_have.iter().any(|t| term_matches(t, candidate)) {
        1.0
    } else {
        0.0
    };
    let must_not_penalty = if story.must_not.iter().any(|t| term_matches(t, candidate)) {
        1.0
    } else {
        0.0
    };

    weights.alpha_semantic * semantic
        + weights.beta_rating * rating_norm
        + weights.gamma_distance * distance_score
        + weights.delta_tag_overlap * overlap
        + weights.epsilon_pace_fit * pace
        + weights.zeta_must_have * must_have_bonus
        - weights.eta_must_not * must_not_penalty
}

/// Scores every candidate and returns them sorted by final score
/// descending, breaking ties by rating descending, then distance
/// ascending, then place id lexicographically, truncated to `top_k`.
pub fn rerank(mut candidates: Vec<Candidate>, story: &Story, weights: &RerankWeights, top_k: usize) -> Vec<Candidate> {
    for candidate in &mut candidates {
        candidate.final_score = score_one(candidate, story, weights);
    }

    candidates.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                b.place
                    .rating
                    .unwrap_or(0.0)
                    .partial_cmp(&a.place.rating.unwrap_or(0.0))
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| {
                a.distance_meters
                    .partial_cmp(&b.distance_meters)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.place.id.cmp(&b.place.id))
    });

    candidates.truncate(top_k);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::place::{Place, Point};
    use crate::models::story::DailyWindow;
    use chrono::NaiveDate;

    fn story() -> Story {
        Story {
            destination: "Testville".to_string(),
            anchor: Point { lat: 0.0, lon: 0.0 },
            start_date: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            day_count: 1,
            daily_window: DailyWindow {
                start_minute: 540,
                end_minute: 1260,
            },
            pace: Pace::Moderate,
            interests: vec!["food".to_string()],
            must_have: vec![],
            must_not: vec![],
            budget_tier: None,
            accommodation: None,
        }
    }

    fn candidate(id: &str, rating: f32, distance: f64) -> Candidate {
        let place = Place {
            id: id.to_string(),
            name: id.to_string(),
            point: Point { lat: 0.0, lon: 0.0 },
            categories: vec![],
            tags: vec!["food".to_string()],
            default_stay_minutes: 60,
            price_tier: None,
            rating: Some(rating),
        };
        let mut c = Candidate::new(place, distance);
        c.semantic_score = Some(0.5);
        c.structured_score = Some(0.5);
        c
    }

    #[test]
    fn higher_rating_breaks_ties_when_scores_equal() {
        let story = story();
        let weights = RerankWeights::default();
        let a = candidate("a", 4.9, 1000.0);
        let b = candidate("b", 4.9, 1000.0);
        let ranked = rerank(vec![b, a], &story, &weights, 10);
        // identical inputs aside from id -> lexicographic tie-break
        assert_eq!(ranked[0].place.id, "a");
    }

    #[test]
    fn must_not_penalizes_below_must_have() {
        let mut story = story();
        story.must_not = vec![ConstraintTerm::Tag("food".to_string())];
        let weights = RerankWeights::default();
        let ranked = rerank(vec![candidate("a", 4.0, 500.0)], &story, &weights, 10);
        assert!(ranked[0].final_score < 0.5);
    }
}
