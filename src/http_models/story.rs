/*
 * src/http_models/story.rs
 *
 * File for the Story wire schema
 *
 * Purpose:
 *   The structured form of a trip request surfaced to API clients that
 *   want to inspect what the extractor understood, without talking in
 *   free text.
 */

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DailyWindowDto {
    /// "HH:MM" local start of the day's activity window.
    pub start: String,
    /// "HH:MM" local end of the day's activity window.
    pub end: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StoryDto {
    /// Free-text destination as understood by the extractor.
    pub destination: String,
    /// ISO date the trip begins.
    pub start_date: String,
    /// Number of days in the trip.
    pub day_count: u32,
    pub daily_window: DailyWindowDto,
    /// One of "relaxed", "moderate", "intensive".
    pub pace: String,
    pub interests: Vec<String>,
    pub must_have: Vec<String>,
    pub must_not: Vec<String>,
    /// 1 (budget) through 5 (luxury), if stated.
    pub budget: Option<u8>,
}
