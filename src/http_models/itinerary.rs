/*
 * src/http_models/itinerary.rs
 *
 * File for Itinerary wire schema and related responses
 *
 * Include:
 *   VisitDto        - a single scheduled stop
 *   DayPlanDto      - one day's ordered visits
 *   ItineraryDto    - the full multi-day plan returned to the client
 */

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::itinerary::{DayPlan, Itinerary, Visit};
use crate::models::place::Accommodation;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VisitDto {
    pub place_id: String,
    pub name: String,
    /// "HH:MM" local arrival time.
    pub eta: String,
    /// "HH:MM" local departure time.
    pub etd: String,
    pub travel_minutes: u32,
    pub stay_minutes: u32,
    /// True when the travel time feeding this visit came from the
    /// great-circle fallback rather than the routing backend.
    pub travel_estimated: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccommodationDto {
    pub place_id: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DayPlanDto {
    pub day: u32,
    /// ISO calendar date for this day.
    pub date: String,
    pub visits: Vec<VisitDto>,
    pub accommodation: Option<AccommodationDto>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItineraryDto {
    pub days: Vec<DayPlanDto>,
    pub version: u32,
    /// Set when a deadline or repair ladder forced a partial result.
    pub truncated: bool,
}

fn minute_to_hhmm(minute: u32) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

impl From<&Visit> for VisitDto {
    fn from(v: &Visit) -> Self {
        VisitDto {
            place_id: v.place_id.clone(),
            name: v.name.clone(),
            eta: minute_to_hhmm(v.eta_minute),
            etd: minute_to_hhmm(v.etd_minute),
            travel_minutes: v.travel_minutes_in,
            stay_minutes: v.stay_minutes,
            travel_estimated: v.travel_estimated,
        }
    }
}

impl From<&Accommodation> for AccommodationDto {
    fn from(a: &Accommodation) -> Self {
        AccommodationDto {
            place_id: a.place_id.clone(),
            name: a.name.clone(),
        }
    }
}

impl From<&DayPlan> for DayPlanDto {
    fn from(d: &DayPlan) -> Self {
        DayPlanDto {
            day: d.day_index,
            date: d.date.to_string(),
            visits: d.visits.iter().map(VisitDto::from).collect(),
            accommodation: d.accommodation.as_ref().map(AccommodationDto::from),
        }
    }
}

impl From<&Itinerary> for ItineraryDto {
    fn from(it: &Itinerary) -> Self {
        ItineraryDto {
            days: it.days.iter().map(DayPlanDto::from).collect(),
            version: it.version,
            truncated: it.truncated,
        }
    }
}
