/*
 * src/models/place.rs
 *
 * File for the Place and OpeningHours domain types
 *
 * Purpose:
 *   Places are externally curated and ingested; this module is the
 *   read-only domain view the retriever, reranker, and planner consume.
 */

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    /// Great-circle distance in meters (haversine).
    pub fn distance_meters(&self, other: &Point) -> f64 {
        const EARTH_RADIUS_M: f64 = 6_371_000.0;
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }
}

/// A trip-wide or per-day lodging point, used to anchor a day's route
/// construction when present (see `ConstraintTerm`-adjacent anchor tiering
/// in the planner).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Accommodation {
    pub place_id: String,
    pub name: String,
    pub point: Point,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub point: Point,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub default_stay_minutes: u32,
    pub price_tier: Option<u8>,
    pub rating: Option<f32>,
}

/// A single open interval on a given weekday, minutes-from-midnight.
/// `close_minute < open_minute` denotes an overnight wrap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OpeningInterval {
    pub weekday: u8,
    pub open_minute: u32,
    pub close_minute: u32,
}

impl OpeningInterval {
    pub fn wraps_midnight(&self) -> bool {
        self.close_minute < self.open_minute
    }

    /// Whether `[start, end]` (same-day minutes) fits entirely within this
    /// interval, accounting for an overnight wrap by treating `close_minute`
    /// as `close_minute + 1440` when it wraps.
    pub fn contains(&self, start: u32, end: u32) -> bool {
        if self.wraps_midnight() {
            let close = self.close_minute + 1440;
            start >= self.open_minute && end <= close
        } else {
            start >= self.open_minute && end <= self.close_minute
        }
    }
}
