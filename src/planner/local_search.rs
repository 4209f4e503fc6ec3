/*
 * src/planner/local_search.rs
 *
 * File for per-day 2-opt refinement
 *
 * Purpose:
 *   Reverse contiguous sub-sequences of a day's visits when doing so
 *   strictly reduces total travel time and keeps the result feasible.
 *   First-improvement, scanning segment lengths ascending then start
 *   index ascending, for deterministic output given identical inputs.
 */

use std::collections::HashMap;
use std::sync::Arc;

use crate::models::itinerary::Visit;
use crate::models::place::{Place, Point};
use crate::planner::timeline::{retime, total_travel_minutes, TimelineInputs};
use crate::travel_time::TravelTimeOracle;

pub async fn two_opt_refine(
    visits: Vec<Visit>,
    anchor: Point,
    places_by_id: &HashMap<String, Place>,
    stay_minutes: &HashMap<String, u32>,
    oracle: &Arc<TravelTimeOracle>,
    inputs: &TimelineInputs<'_>,
    iteration_cap: usize,
) -> Vec<Visit> {
    let mut current = visits;
    let n = current.len();
    if n < 3 {
        return current;
    }

    let mut iterations = 0;
    loop {
        if iterations >= iteration_cap {
            break;
        }

        let mut applied = false;

        'scan: for seg_len in 2..=n {
            for start in 0..=(n - seg_len) {
                let end = start + seg_len - 1;

                let mut order_ids: Vec<&str> = current.iter().map(|v| v.place_id.as_str()).collect();
                order_ids[start..=end].reverse();

                let order: Option<Vec<&Place>> = order_ids
                    .iter()
                    .map(|id| places_by_id.get(*id))
                    .collect();
                let Some(order) = order else { continue };

                if let Some(new_visits) =
                    retime(anchor, &order, stay_minutes, oracle, inputs).await
                {
                    if total_travel_minutes(&new_visits) < total_travel_minutes(&current) {
                        current = new_visits;
                        applied = true;
                        iterations += 1;
                        break 'scan;
                    }
                }
            }
        }

        if !applied {
            break;
        }
    }

    current
}
