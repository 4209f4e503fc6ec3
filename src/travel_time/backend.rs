/*
 * src/travel_time/backend.rs
 *
 * File for Travel-Time routing backends
 *
 * Purpose:
 *   GoogleMapsBackend calls the real Distance Matrix API the way
 *   research.rs's tools call Geocoding/Nearby Search. MockBackend backs
 *   tests and any deployment without an API key, selected the same way
 *   the LLM agent is gated behind a deploy flag.
 */

use async_trait::async_trait;

use crate::global::GOOGLE_MAPS_API_KEY;
use crate::models::place::Point;

#[async_trait]
pub trait TravelTimeBackend: Send + Sync {
    async fn route_duration(&self, origin: Point, dest: Point) -> Result<u32, String>;
    async fn table(&self, points: &[Point]) -> Result<Vec<Vec<u32>>, String>;
}

pub struct GoogleMapsBackend {
    client: google_maps::Client,
}

impl GoogleMapsBackend {
    pub fn from_env() -> Result<Self, String> {
        let api_key = std::env::var(GOOGLE_MAPS_API_KEY)
            .map_err(|_| "GOOGLE_MAPS_API_KEY is not set".to_string())?;
        let client = google_maps::Client::try_new(api_key)
            .map_err(|_| "failed to create Google Maps client".to_string())?;
        Ok(GoogleMapsBackend { client })
    }
}

#[async_trait]
impl TravelTimeBackend for GoogleMapsBackend {
    async fn route_duration(&self, origin: Point, dest: Point) -> Result<u32, String> {
        let result = self
            .client
            .directions(
                google_maps::directions::Location::LatLng(
                    google_maps::LatLng::try_from_f64(origin.lat, origin.lon)
                        .map_err(|e| e.to_string())?,
                ),
                google_maps::directions::Location::LatLng(
                    google_maps::LatLng::try_from_f64(dest.lat, dest.lon)
                        .map_err(|e| e.to_string())?,
                ),
            )
            .execute()
            .await
            .map_err(|e| e.to_string())?;

        let leg = result
            .routes
            .first()
            .and_then(|r| r.legs.first())
            .ok_or("directions response had no route legs")?;

        Ok(leg.duration.value.0 as u32)
    }

    async fn table(&self, points: &[Point]) -> Result<Vec<Vec<u32>>, String> {
        let mut out = Vec::with_capacity(points.len());
        for &origin in points {
            let mut row = Vec::with_capacity(points.len());
            for &dest in points {
                if origin.lat == dest.lat && origin.lon == dest.lon {
                    row.push(0);
                } else {
                    row.push(self.route_duration(origin, dest).await?);
                }
            }
            out.push(row);
        }
        Ok(out)
    }
}

/// Deterministic great-circle-based backend for tests and API-key-less
/// deployments; never fails.
pub struct MockTravelTimeBackend {
    pub speed_mps: f64,
}

impl Default for MockTravelTimeBackend {
    fn default() -> Self {
        MockTravelTimeBackend { speed_mps: 13.9 }
    }
}

#[async_trait]
impl TravelTimeBackend for MockTravelTimeBackend {
    async fn route_duration(&self, origin: Point, dest: Point) -> Result<u32, String> {
        Ok((origin.distance_meters(&dest) / self.speed_mps) as u32)
    }

    async fn table(&self, points: &[Point]) -> Result<Vec<Vec<u32>>, String> {
        let mut out = Vec::with_capacity(points.len());
        for &origin in points {
            let mut row = Vec::with_capacity(points.len());
            for &dest in points {
                row.push((origin.distance_meters(&dest) / self.speed_mps) as u32);
            }
            out.push(row);
        }
        Ok(out)
    }
}
