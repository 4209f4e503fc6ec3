/*
 * src/models/candidate.rs
 *
 * File for the Candidate domain type produced by the hybrid retriever
 * and scored by the reranker.
 */

use serde::{Deserialize, Serialize};

use crate::models::place::Place;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub place: Place,
    pub semantic_score: Option<f64>,
    pub structured_score: Option<f64>,
    pub distance_meters: f64,
    pub final_score: f64,
}

impl Candidate {
    pub fn new(place: Place, distance_meters: f64) -> Self {
        Candidate {
            place,
            semantic_score: None,
            structured_score: None,
            distance_meters,
            final_score: 0.0,
        }
    }
}
