/*
 * src/travel_time/mod.rs
 *
 * File for the Travel-Time Oracle
 *
 * Purpose:
 *   Pairwise and batch driving-duration lookups, backed by a read-through
 *   cache and a pluggable routing backend. On backend failure, falls back
 *   to a great-circle estimate flagged as estimated.
 */

pub mod backend;
pub mod cache;

use std::sync::Arc;
use tracing::warn;

use crate::config::TravelTimeConfig;
use crate::models::place::Point;
use crate::travel_time::backend::TravelTimeBackend;
use crate::travel_time::cache::TravelTimeCache;

/// Assumed average driving speed for the great-circle fallback, in meters
/// per second (~40 km/h to account for urban routing, not highway cruise).
const FALLBACK_SPEED_MPS: f64 = 11.1;

pub struct Duration {
    pub seconds: u32,
    pub estimated: bool,
}

pub struct TravelTimeOracle {
    backend: Arc<dyn TravelTimeBackend>,
    cache: TravelTimeCache,
    config: TravelTimeConfig,
}

impl TravelTimeOracle {
    pub fn new(backend: Arc<dyn TravelTimeBackend>, config: TravelTimeConfig) -> Self {
        TravelTimeOracle {
            backend,
            cache: TravelTimeCache::new(config.cache_capacity, config.cache_ttl_secs),
            config,
        }
    }

    fn fallback(&self, a: Point, b: Point) -> Duration {
        let meters = a.distance_meters(&b);
        let seconds = (meters / FALLBACK_SPEED_MPS * self.config.fallback_inflation) as u32;
        Duration {
            seconds,
            estimated: true,
        }
    }

    pub async fn duration(&self, a: Point, b: Point) -> Duration {
        if let Some(seconds) = self.cache.get(a, b) {
            return Duration {
                seconds,
                estimated: false,
            };
        }

        match self.backend.route_duration(a, b).await {
            Ok(seconds) => {
                let seconds = (seconds as f64 * self.config.peak_multiplier) as u32;
                self.cache.put(a, b, seconds);
                Duration {
                    seconds,
                    estimated: false,
                }
            }
            Err(e) => {
                warn!("WARN ->> travel-time backend failed, using fallback estimate: {e}");
                self.fallback(a, b)
            }
        }
    }

    /// Builds the full N×N duration matrix over `points`, batching any
    /// cells missing from the cache into a single backend call.
    pub async fn matrix(&self, points: &[Point]) -> Vec<Vec<Duration>> {
        let n = points.len();
        let mut missing_pairs = Vec::new();
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                if self.cache.get(points[i], points[j]).is_none() {
                    missing_pairs.push((i, j));
                }
            }
        }

        if !missing_pairs.is_empty() {
            match self.backend.table(points).await {
                Ok(table) => {
                    for &(i, j) in &missing_pairs {
                        if let Some(row) = table.get(i) {
                            if let Some(&seconds) = row.get(j) {
                                let seconds = (seconds as f64 * self.config.peak_multiplier) as u32;
                                self.cache.put(points[i], points[j], seconds);
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!("WARN ->> travel-time batch backend failed, falling back per-pair: {e}");
                }
            }
        }

        let mut result = Vec::with_capacity(n);
        for i in 0..n {
            let mut row = Vec::with_capacity(n);
            for j in 0..n {
                if i == j {
                    row.push(Duration {
                        seconds: 0,
                        estimated: false,
                    });
                    continue;
                }
                if let Some(seconds) = self.cache.get(points[i], points[j]) {
                    row.push(Duration {
                        seconds,
                        estimated: false,
                    });
                } else {
                    row.push(self.fallback(points[i], points[j]));
                }
            }
            result.push(row);
        }
        result
    }
}
