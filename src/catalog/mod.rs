/*
 * src/catalog/mod.rs
 *
 * File for the Catalog Repository contract
 *
 * Purpose:
 *   Read-only access to places, their attributes, and weekly opening
 *   hours. The only implementation shipped here is Postgres-backed, but
 *   retrieval and planning code depend on the trait, not the adapter.
 */

pub mod postgres;
pub mod vector;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::AppError;
use crate::models::place::{OpeningInterval, Place, Point};

#[derive(Debug, Clone, Default)]
pub struct PlaceFilter {
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub min_rating: Option<f32>,
    pub max_price_tier: Option<u8>,
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn find_places(
        &self,
        center: Point,
        radius_m: f64,
        filter: &PlaceFilter,
        limit: usize,
    ) -> Result<Vec<Place>, AppError>;

    async fn get_hours(
        &self,
        place_ids: &[String],
    ) -> Result<HashMap<String, Vec<OpeningInterval>>, AppError>;

    async fn get_places_by_id(&self, place_ids: &[String]) -> Result<Vec<Place>, AppError>;
}

pub use postgres::PostgresCatalog;
pub use vector::{PostgresVectorIndex, VectorIndex};
