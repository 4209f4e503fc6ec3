/*
 * src/travel_time/cache.rs
 *
 * File for the Travel-Time Oracle's read-through cache
 *
 * Purpose:
 *   Key by a coordinate pair rounded to 5 decimal places (~1m), so that
 *   near-identical query points share a cache entry. LRU eviction bounds
 *   memory; TTL bounds staleness independent of access pattern.
 */

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use crate::models::place::Point;

type Key = (i64, i64, i64, i64);

fn round5(v: f64) -> i64 {
    (v * 100_000.0).round() as i64
}

fn key(a: Point, b: Point) -> Key {
    (round5(a.lat), round5(a.lon), round5(b.lat), round5(b.lon))
}

struct Entry {
    seconds: u32,
    inserted_at: Instant,
}

pub struct TravelTimeCache {
    inner: Mutex<LruCache<Key, Entry>>,
    ttl: Duration,
}

impl TravelTimeCache {
    pub fn new(capacity: usize, ttl_secs: u64) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap();
        TravelTimeCache {
            inner: Mutex::new(LruCache::new(capacity)),
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    pub fn get(&self, a: Point, b: Point) -> Option<u32> {
        let k = key(a, b);
        let mut guard = self.inner.lock();
        match guard.get(&k) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => Some(entry.seconds),
            Some(_) => {
                guard.pop(&k);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, a: Point, b: Point, seconds: u32) {
        let k = key(a, b);
        self.inner.lock().put(
            k,
            Entry {
                seconds,
                inserted_at: Instant::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounded_key_collapses_near_identical_points() {
        let cache = TravelTimeCache::new(16, 3600);
        let a = Point { lat: 1.000001, lon: 2.000001 };
        let b = Point { lat: 3.0, lon: 4.0 };
        cache.put(a, b, 120);

        let a_close = Point { lat: 1.0000013, lon: 2.0000011 };
        assert_eq!(cache.get(a_close, b), Some(120));
    }

    #[test]
    fn miss_returns_none() {
        let cache = TravelTimeCache::new(16, 3600);
        let a = Point { lat: 1.0, lon: 2.0 };
        let b = Point { lat: 3.0, lon: 4.0 };
        assert_eq!(cache.get(a, b), None);
    }
}
