/*
 * src/retrieval/fuse.rs
 *
 * File for fusing the structured and semantic candidate sets
 *
 * Purpose:
 *   Union by place id; where a candidate only came from one branch, impute
 *   the missing signal rather than dropping it.
 */

use std::collections::HashMap;

use crate::models::candidate::Candidate;

/// Prior used when a candidate has no semantic signal at all.
const MISSING_SEMANTIC_PRIOR: f64 = 0.0;

pub fn fuse(structured: Vec<Candidate>, semantic: Vec<Candidate>) -> Vec<Candidate> {
    let mut by_id: HashMap<String, Candidate> = HashMap::new();

    for candidate in structured {
        by_id.insert(candidate.place.id.clone(), candidate);
    }

    for candidate in semantic {
        by_id
            .entry(candidate.place.id.clone())
            .and_modify(|existing| {
                existing.semantic_score = candidate.semantic_score;
            })
            .or_insert(candidate);
    }

    for candidate in by_id.values_mut() {
        if candidate.semantic_score.is_none() {
            candidate.semantic_score = Some(MISSING_SEMANTIC_PRIOR);
        }
        if candidate.structured_score.is_none() {
            let rating = candidate.place.rating.map(|r| r as f64 / 5.0).unwrap_or(0.3);
            candidate.structured_score = Some(rating);
        }
    }

    let mut fused: Vec<Candidate> = by_id.into_values().collect();
    fused.sort_by(|a, b| a.place.id.cmp(&b.place.id));
    fused
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::place::{Place, Point};

    fn place(id: &str) -> Place {
        Place {
            id: id.to_string(),
            name: id.to_string(),
            point: Point { lat: 0.0, lon: 0.0 },
            categories: vec![],
            tags: vec![],
            default_stay_minutes: 30,
            price_tier: None,
            rating: None,
        }
    }

    #[test]
    fn fuse_is_idempotent_and_dedups_by_id() {
        let mut c1 = Candidate::new(place("a"), 100.0);
        c1.structured_score = Some(0.5);
        let mut c2 = Candidate::new(place("a"), 100.0);
        c2.semantic_score = Some(0.8);

        let once = fuse(vec![c1.clone()], vec![c2.clone()]);
        assert_eq!(once.len(), 1);
        assert_eq!(once[0].semantic_score, Some(0.8));
        assert_eq!(once[0].structured_score, Some(0.5));

        let twice = fuse(once.clone(), vec![]);
        assert_eq!(twice.len(), once.len());
    }
}
