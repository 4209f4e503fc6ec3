/*
 * src/models/itinerary.rs
 *
 * File for Visit, DayPlan, and Itinerary domain types produced by the
 * planner and mutated by the feedback engine.
 */

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::place::Accommodation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visit {
    pub place_id: String,
    pub name: String,
    pub eta_minute: u32,
    pub etd_minute: u32,
    pub travel_minutes_in: u32,
    pub stay_minutes: u32,
    /// Set when the travel time feeding this visit was a fallback estimate.
    pub travel_estimated: bool,
}

impl Visit {
    pub fn is_consistent(&self) -> bool {
        self.etd_minute == self.eta_minute + self.stay_minutes
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPlan {
    pub day_index: u32,
    pub date: NaiveDate,
    pub visits: Vec<Visit>,
    pub accommodation: Option<Accommodation>,
}

impl DayPlan {
    pub fn total_minutes(&self) -> u32 {
        self.visits
            .iter()
            .map(|v| v.travel_minutes_in + v.stay_minutes)
            .sum()
    }

    pub fn contains(&self, place_id: &str) -> bool {
        self.visits.iter().any(|v| v.place_id == place_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    pub days: Vec<DayPlan>,
    pub version: u32,
    pub truncated: bool,
}

impl Itinerary {
    pub fn used_place_ids(&self) -> std::collections::HashSet<String> {
        self.days
            .iter()
            .flat_map(|d| d.visits.iter().map(|v| v.place_id.clone()))
            .collect()
    }

    pub fn has_duplicate_places(&self) -> bool {
        let ids = self.used_place_ids();
        let total: usize = self.days.iter().map(|d| d.visits.len()).sum();
        ids.len() != total
    }
}
