/*
 * src/models/story.rs
 *
 * File for the Story domain type produced by the extractor
 */

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::place::{Accommodation, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Relaxed,
    Moderate,
    Intensive,
}

impl Default for Pace {
    fn default() -> Self {
        Pace::Moderate
    }
}

/// A hard inclusion/exclusion constraint term, tagged by what kind of
/// reference it resolves against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum ConstraintTerm {
    PlaceId(String),
    Name(String),
    Tag(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DailyWindow {
    pub start_minute: u32,
    pub end_minute: u32,
}

impl DailyWindow {
    pub fn is_well_formed(&self) -> bool {
        self.start_minute < self.end_minute && self.end_minute <= 1440
    }

    pub fn budget_minutes(&self) -> u32 {
        self.end_minute - self.start_minute
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub destination: String,
    pub anchor: Point,
    pub start_date: NaiveDate,
    pub day_count: u32,
    pub daily_window: DailyWindow,
    pub pace: Pace,
    pub interests: Vec<String>,
    pub must_have: Vec<ConstraintTerm>,
    pub must_not: Vec<ConstraintTerm>,
    pub budget_tier: Option<u8>,
    /// Lodging for the whole trip, when known. Anchors every day's route
    /// construction ahead of the previous day's last visit or the
    /// destination centroid.
    pub accommodation: Option<Accommodation>,
}

impl Story {
    pub fn target_visits_per_day(&self, base: u32) -> u32 {
        match self.pace {
            Pace::Relaxed => base.saturating_sub(2).max(1),
            Pace::Moderate => base,
            Pace::Intensive => base + 2,
        }
    }
}
