/*
 * src/catalog/postgres.rs
 *
 * File for the Postgres-backed Catalog Repository
 *
 * Purpose:
 *   Spatial/attribute lookups over the externally-ingested `places` and
 *   `place_hours` tables. The radius filter uses a bounding-box prefilter
 *   (cheap, index-friendly) followed by an exact haversine check, the way
 *   a query without PostGIS has to.
 */

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;

use crate::catalog::{CatalogRepository, PlaceFilter};
use crate::error::{AppError, PrivateError};
use crate::models::place::{OpeningInterval, Place, Point};
use crate::sql_models::place::{PlaceHoursRow, PlaceRow};

pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    pub fn new(pool: PgPool) -> Self {
        PostgresCatalog { pool }
    }
}

/// Degrees of latitude/longitude per meter at the given latitude, used for
/// a cheap bounding-box prefilter before the exact haversine cut.
fn degree_span(center: Point, radius_m: f64) -> (f64, f64) {
    let lat_span = radius_m / 111_320.0;
    let lon_span = radius_m / (111_320.0 * center.lat.to_radians().cos().max(0.01));
    (lat_span, lon_span)
}

#[async_trait]
impl CatalogRepository for PostgresCatalog {
    async fn find_places(
        &self,
        center: Point,
        radius_m: f64,
        filter: &PlaceFilter,
        limit: usize,
    ) -> Result<Vec<Place>, AppError> {
        let (lat_span, lon_span) = degree_span(center, radius_m);

        let rows: Vec<PlaceRow> = sqlx::query_as::<_, PlaceRow>(
            r#"
            SELECT id, name, lat, lon, categories, tags, default_stay_minutes,
                   price_tier, rating, embedding
            FROM places
            WHERE lat BETWEEN $1 - $2 AND $1 + $2
              AND lon BETWEEN $3 - $4 AND $3 + $4
              AND ($5::text[] IS NULL OR categories && $5)
              AND ($6::text[] IS NULL OR tags && $6)
              AND ($7::real IS NULL OR rating >= $7)
              AND ($8::smallint IS NULL OR price_tier <= $8)
            LIMIT $9
            "#,
        )
        .bind(center.lat)
        .bind(lat_span)
        .bind(center.lon)
        .bind(lon_span)
        .bind(if filter.categories.is_empty() {
            None
        } else {
            Some(&filter.categories)
        })
        .bind(if filter.tags.is_empty() {
            None
        } else {
            Some(&filter.tags)
        })
        .bind(filter.min_rating)
        .bind(filter.max_price_tier.map(|t| t as i16))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::from(PrivateError::Db(e)))?;

        let places = rows
            .into_iter()
            .map(|r| Place {
                id: r.id,
                name: r.name,
                point: Point {
                    lat: r.lat,
                    lon: r.lon,
                },
                categories: r.categories,
                tags: r.tags,
                default_stay_minutes: r.default_stay_minutes.max(0) as u32,
                price_tier: r.price_tier.map(|p| p as u8),
                rating: r.rating,
            })
            .filter(|p| p.point.distance_meters(&center) <= radius_m)
            .collect();

        Ok(places)
    }

    async fn get_hours(
        &self,
        place_ids: &[String],
    ) -> Result<HashMap<String, Vec<OpeningInterval>>, AppError> {
        if place_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<PlaceHoursRow> = sqlx::query_as::<_, PlaceHoursRow>(
            "SELECT place_id, weekday, open_minute, close_minute
             FROM place_hours
             WHERE place_id = ANY($1)",
        )
        .bind(place_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::from(PrivateError::Db(e)))?;

        let mut map: HashMap<String, Vec<OpeningInterval>> = HashMap::new();
        for row in rows {
            map.entry(row.place_id).or_default().push(OpeningInterval {
                weekday: row.weekday.max(0) as u8,
                open_minute: row.open_minute.max(0) as u32,
                close_minute: row.close_minute.max(0) as u32,
            });
        }
        Ok(map)
    }

    async fn get_places_by_id(&self, place_ids: &[String]) -> Result<Vec<Place>, AppError> {
        if place_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<PlaceRow> = sqlx::query_as::<_, PlaceRow>(
            r#"
            SELECT id, name, lat, lon, categories, tags, default_stay_minutes,
                   price_tier, rating, embedding
            FROM places
            WHERE id = ANY($1)
            "#,
        )
        .bind(place_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::from(PrivateError::Db(e)))?;

        Ok(rows
            .into_iter()
            .map(|r| Place {
                id: r.id,
                name: r.name,
                point: Point {
                    lat: r.lat,
                    lon: r.lon,
                },
                categories: r.categories,
                tags: r.tags,
                default_stay_minutes: r.default_stay_minutes.max(0) as u32,
                price_tier: r.price_tier.map(|p| p as u8),
                rating: r.rating,
            })
            .collect())
    }
}
