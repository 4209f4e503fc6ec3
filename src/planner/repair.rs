/*
 * src/planner/repair.rs
 *
 * File for the infeasibility repair ladder
 *
 * Purpose:
 *   Remediation strategies tried in order when a day's visit sequence
 *   cannot be made to fit: a light 3-opt exchange, shortening the longest
 *   stay, and substituting a blocking candidate for the next-ranked one
 *   sharing a tag or category. Cross-day moves (shift day, expand radius)
 *   and the final NeedsUserDecision are assembled by the caller, which
 *   has the whole itinerary in view.
 */

use std::collections::HashMap;
use std::sync::Arc;

use crate::models::candidate::Candidate;
use crate::models::itinerary::Visit;
use crate::models::place::{Place, Point};
use crate::planner::timeline::{retime, total_travel_minutes, TimelineInputs};
use crate::travel_time::TravelTimeOracle;

/// Tries every distinct triple of positions, swapping their order, and
/// returns the first feasible swap that strictly reduces total travel time.
pub async fn light_three_opt(
    visits: &[Visit],
    anchor: Point,
    places_by_id: &HashMap<String, Place>,
    stay_minutes: &HashMap<String, u32>,
    oracle: &Arc<TravelTimeOracle>,
    inputs: &TimelineInputs<'_>,
) -> Option<Vec<Visit>> {
    let n = visits.len();
    if n < 3 {
        return None;
    }

    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                let mut ids: Vec<&str> = visits.iter().map(|v| v.place_id.as_str()).collect();
                ids.swap(i, j);
                ids.swap(j, k);

                let order: Option<Vec<&Place>> =
                    ids.iter().map(|id| places_by_id.get(*id)).collect();
                let Some(order) = order else { continue };

                if let Some(new_visits) = retime(anchor, &order, stay_minutes, oracle, inputs).await {
                    if total_travel_minutes(&new_visits) < total_travel_minutes(visits) {
                        return Some(new_visits);
                    }
                }
            }
        }
    }
    None
}

/// Shortens the longest-stay visit by up to 25% and re-lays out the day.
pub async fn shorten_longest_stay(
    visits: &[Visit],
    anchor: Point,
    places_by_id: &HashMap<String, Place>,
    oracle: &Arc<TravelTimeOracle>,
    inputs: &TimelineInputs<'_>,
) -> Option<Vec<Visit>> {
    let longest = visits.iter().max_by_key(|v| v.stay_minutes)?;
    let shortened_minutes = (longest.stay_minutes * 3) / 4;

    let mut stay_minutes: HashMap<String, u32> = visits
        .iter()
        .map(|v| (v.place_id.clone(), v.stay_minutes))
        .collect();
    stay_minutes.insert(longest.place_id.clone(), shortened_minutes);

    let order: Option<Vec<&Place>> = visits
        .iter()
        .map(|v| places_by_id.get(&v.place_id))
        .collect();
    let order = order?;

    retime(anchor, &order, &stay_minutes, oracle, inputs).await
}

/// Replaces `blocking_place_id` with the next-ranked unused candidate that
/// shares at least one category or tag with it.
pub async fn substitute_candidate(
    visits: &[Visit],
    blocking_place_id: &str,
    blocking_place: &Place,
    replacement_pool: &[Candidate],
    used_ids: &std::collections::HashSet<String>,
    anchor: Point,
    places_by_id: &HashMap<String, Place>,
    stay_minutes: &HashMap<String, u32>,
    oracle: &Arc<TravelTimeOracle>,
    inputs: &TimelineInputs<'_>,
) -> Option<Vec<Visit>> {
    let position = visits.iter().position(|v| v.place_id == blocking_place_id)?;

    for replacement in replacement_pool {
        if used_ids.contains(&replacement.place.id) || replacement.place.id == blocking_place_id {
            continue;
        }
        let shares_tag = replacement
            .place
            .tags
            .iter()
            .any(|t| blocking_place.tags.contains(t))
            || replacement
                .place
                .categories
                .iter()
                .any(|c| blocking_place.categories.contains(c));
        if !shares_tag {
            continue;
        }

        let mut ids: Vec<String> = visits.iter().map(|v| v.place_id.clone()).collect();
        ids[position] = replacement.place.id.clone();

        let mut places = places_by_id.clone();
        places.insert(replacement.place.id.clone(), replacement.place.clone());

        let order: Option<Vec<&Place>> = ids.iter().map(|id| places.get(id)).collect();
        let Some(order) = order else { continue };

        if let Some(new_visits) = retime(anchor, &order, stay_minutes, oracle, inputs).await {
            return Some(new_visits);
        }
    }
    None
}
