/*
 * src/sql_models/place.rs
 *
 * File for Place and PlaceHours row models
 *
 * Purpose:
 *   FromRow mappings for the externally-ingested `places` and
 *   `place_hours` tables, plus pgvector-backed nearest-neighbor rows.
 */

use pgvector::Vector;
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct PlaceRow {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub default_stay_minutes: i32,
    pub price_tier: Option<i16>,
    pub rating: Option<f32>,
    pub embedding: Option<Vector>,
}

#[derive(Debug, FromRow)]
pub struct PlaceHoursRow {
    pub place_id: String,
    pub weekday: i16,
    pub open_minute: i32,
    pub close_minute: i32,
}

#[derive(Debug, FromRow)]
pub struct VectorMatchRow {
    pub id: String,
    pub similarity: f64,
}
