/*
 * src/planner/timeline.rs
 *
 * File for sequencing a day's visits into concrete arrival/departure times
 *
 * Purpose:
 *   Shared by greedy construction, 2-opt refinement, and repair: given an
 *   ordered sequence of places starting from an anchor point, compute each
 *   visit's ETA/ETD against opening hours and the daily window, or fail if
 *   any leg is infeasible.
 */

use std::collections::HashMap;
use std::sync::Arc;

use crate::models::itinerary::Visit;
use crate::models::place::{OpeningInterval, Place, Point};
use crate::models::story::DailyWindow;
use crate::planner::feasibility::feasible_window;
use crate::travel_time::TravelTimeOracle;

pub struct TimelineInputs<'a> {
    pub hours: &'a HashMap<String, Vec<OpeningInterval>>,
    pub weekday: u8,
    pub daily_window: DailyWindow,
}

/// Lays out `order` (a sequence of places) starting from `anchor` at
/// `daily_window.start_minute`. Returns None if any visit cannot be fit.
pub async fn retime(
    anchor: Point,
    order: &[&Place],
    stay_minutes: &HashMap<String, u32>,
    oracle: &Arc<TravelTimeOracle>,
    inputs: &TimelineInputs<'_>,
) -> Option<Vec<Visit>> {
    let mut visits = Vec::with_capacity(order.len());
    let mut cursor = anchor;
    let mut t = inputs.daily_window.start_minute;

    for place in order {
        let travel = oracle.duration(cursor, place.point).await;
        let travel_minutes = travel.seconds / 60;
        let earliest_arrival = t + travel_minutes;
        let stay = *stay_minutes.get(&place.id).unwrap_or(&place.default_stay_minutes);

        let (eta, etd) = if inputs.hours.contains_key(&place.id) {
            feasible_window(
                inputs.hours,
                &place.id,
                inputs.weekday,
                earliest_arrival,
                stay,
                inputs.daily_window,
            )?
        } else {
            let etd = earliest_arrival + stay;
            if etd > inputs.daily_window.end_minute {
                return None;
            }
            (earliest_arrival, etd)
        };

        visits.push(Visit {
            place_id: place.id.clone(),
            name: place.name.clone(),
            eta_minute: eta,
            etd_minute: etd,
            travel_minutes_in: travel_minutes,
            stay_minutes: stay,
            travel_estimated: travel.estimated,
        });

        t = etd;
        cursor = place.point;
    }

    Some(visits)
}

pub fn total_travel_minutes(visits: &[Visit]) -> u32 {
    visits.iter().map(|v| v.travel_minutes_in).sum()
}
