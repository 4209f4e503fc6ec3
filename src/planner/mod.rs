/*
 * src/planner/mod.rs
 *
 * File for the Planner
 *
 * Purpose:
 *   Ties greedy construction, 2-opt refinement, and the repair ladder
 *   together into a multi-day Itinerary, or a NeedsUserDecision outcome
 *   when the ladder is exhausted.
 */

pub mod feasibility;
pub mod greedy;
pub mod local_search;
pub mod repair;
pub mod timeline;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Days;

use crate::catalog::CatalogRepository;
use crate::config::PlannerConfig;
use crate::error::AppError;
use crate::models::candidate::Candidate;
use crate::models::itinerary::{DayPlan, Itinerary, Visit};
use crate::models::place::{Place, Point};
use crate::models::story::{ConstraintTerm, Story};
use crate::planner::feasibility::weekday_of;
use crate::planner::timeline::{retime, TimelineInputs};
use crate::travel_time::TravelTimeOracle;

pub enum PlanOutcome {
    Feasible(Itinerary),
    NeedsDecision {
        violations: Vec<String>,
        partial: Itinerary,
    },
}

fn matches_term(term: &ConstraintTerm, place: &Place) -> bool {
    match term {
        ConstraintTerm::PlaceId(id) => &place.id == id,
        ConstraintTerm::Name(name) => place.name.eq_ignore_ascii_case(name),
        ConstraintTerm::Tag(tag) => place.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)),
    }
}

/// Assigns each must-have term to a day, round-robin. More than one
/// must-have can land on the same day once every day has had a turn, in
/// which case they compete for slots like any other forced candidate.
fn assign_must_haves_to_days(story: &Story, candidates: &[Candidate]) -> HashMap<u32, Vec<String>> {
    let mut assignment: HashMap<u32, Vec<String>> = HashMap::new();
    let mut day = 0u32;
    for term in &story.must_have {
        if let Some(candidate) = candidates.iter().find(|c| matches_term(term, &c.place)) {
            assignment.entry(day).or_default().push(candidate.place.id.clone());
            day = (day + 1) % story.day_count.max(1);
        }
    }
    assignment
}

/// Tries the repair ladder's day-local rungs (reorder, shorten, substitute)
/// to fit a must-have that greedy construction could not place. Cross-day
/// rungs (shift day, expand radius) are not day-local and are left to a
/// future iteration; exhausting these rungs here surfaces as a
/// `NeedsUserDecision` citing the missing id, never a silent drop.
async fn repair_missing_must_have(
    visits: &[Visit],
    forced_id: &str,
    anchor: Point,
    places_by_id: &HashMap<String, Place>,
    oracle: &Arc<TravelTimeOracle>,
    inputs: &TimelineInputs<'_>,
) -> Option<Vec<Visit>> {
    let forced_place = places_by_id.get(forced_id)?;

    fn append_order<'a>(
        base: &[Visit],
        forced_place: &'a Place,
        places_by_id: &'a HashMap<String, Place>,
    ) -> Vec<&'a Place> {
        let mut order: Vec<&Place> = base
            .iter()
            .filter_map(|v| places_by_id.get(&v.place_id))
            .collect();
        order.push(forced_place);
        order
    }

    // Rung: light 3-opt first to see if reordering frees enough budget,
    // then try appending the must-have to the (possibly reordered) day.
    let stay_minutes: HashMap<String, u32> = visits
        .iter()
        .map(|v| (v.place_id.clone(), v.stay_minutes))
        .collect();
    if let Some(reordered) =
        repair::light_three_opt(visits, anchor, places_by_id, &stay_minutes, oracle, inputs).await
    {
        let order = append_order(&reordered, forced_place, places_by_id);
        if let Some(appended) = retime(anchor, &order, &stay_minutes, oracle, inputs).await {
            return Some(appended);
        }
    }

    // Rung: append as-is, unreordered.
    let order = append_order(visits, forced_place, places_by_id);
    if let Some(appended) = retime(anchor, &order, &stay_minutes, oracle, inputs).await {
        return Some(appended);
    }

    // Rung: shorten the longest stay to free up budget, then retry the append.
    if let Some(shortened) =
        repair::shorten_longest_stay(visits, anchor, places_by_id, oracle, inputs).await
    {
        let stay_minutes: HashMap<String, u32> = shortened
            .iter()
            .map(|v| (v.place_id.clone(), v.stay_minutes))
            .collect();
        let order = append_order(&shortened, forced_place, places_by_id);
        if let Some(appended) = retime(anchor, &order, &stay_minutes, oracle, inputs).await {
            return Some(appended);
        }
    }

    // Rung: substitute the lowest-ranked scheduled visit, displacing it in
    // favor of the must-have directly.
    if !visits.is_empty() {
        let mut order: Vec<&Place> = visits[..visits.len() - 1]
            .iter()
            .filter_map(|v| places_by_id.get(&v.place_id))
            .collect();
        order.push(forced_place);
        if let Some(substituted) = retime(anchor, &order, &stay_minutes, oracle, inputs).await {
            return Some(substituted);
        }
    }

    None
}

pub async fn plan(
    story: &Story,
    candidates: &[Candidate],
    catalog: &Arc<dyn CatalogRepository>,
    oracle: &Arc<TravelTimeOracle>,
    config: &PlannerConfig,
) -> Result<PlanOutcome, AppError> {
    if candidates.is_empty() {
        return Err(AppError::from(crate::error::PublicError::NoCandidates));
    }

    let places_by_id: HashMap<String, Place> = candidates
        .iter()
        .map(|c| (c.place.id.clone(), c.place.clone()))
        .collect();
    let ids: Vec<String> = candidates.iter().map(|c| c.place.id.clone()).collect();
    let hours = catalog.get_hours(&ids).await?;

    let must_have_by_day = assign_must_haves_to_days(story, candidates);

    let empty_forced: Vec<String> = Vec::new();
    let mut days = Vec::with_capacity(story.day_count as usize);
    let mut global_used: HashSet<String> = HashSet::new();
    let mut anchor = story.anchor;
    let mut violations = Vec::new();

    for day_index in 0..story.day_count {
        let date = story
            .start_date
            .checked_add_days(Days::new(day_index as u64))
            .unwrap_or(story.start_date);
        let weekday = weekday_of(date);
        let forced = must_have_by_day.get(&day_index).unwrap_or(&empty_forced);

        // Anchor tiering: accommodation if present, else the previous
        // day's last visit (`anchor`, carried across iterations), else the
        // destination centroid (`story.anchor`, `anchor`'s initial value).
        let day_anchor = story
            .accommodation
            .as_ref()
            .map(|acc| acc.point)
            .unwrap_or(anchor);

        // Prime the travel-time cache with this day's full point set in one
        // batched call before the per-pair lookups inside construction,
        // refinement, and repair run.
        let day_points: Vec<Point> = std::iter::once(day_anchor)
            .chain(
                candidates
                    .iter()
                    .filter(|c| !global_used.contains(&c.place.id))
                    .map(|c| c.place.point),
            )
            .collect();
        let _ = oracle.matrix(&day_points).await;

        let construction = greedy::construct_day(
            candidates,
            &global_used,
            day_anchor,
            forced,
            weekday,
            story.daily_window,
            &hours,
            &config.planner,
            oracle,
        )
        .await;

        let stay_minutes: HashMap<String, u32> = construction
            .visits
            .iter()
            .map(|v| (v.place_id.clone(), v.stay_minutes))
            .collect();
        let inputs = TimelineInputs {
            hours: &hours,
            weekday,
            daily_window: story.daily_window,
        };

        let refined = local_search::two_opt_refine(
            construction.visits,
            day_anchor,
            &places_by_id,
            &stay_minutes,
            oracle,
            &inputs,
            config.planner.two_opt_iteration_cap,
        )
        .await;

        let mut refined = refined;
        let mut used_ids = construction.used_ids;
        for forced_id in forced {
            if refined.iter().any(|v| &v.place_id == forced_id) {
                continue;
            }
            match repair_missing_must_have(
                &refined,
                forced_id,
                day_anchor,
                &places_by_id,
                oracle,
                &inputs,
            )
            .await
            {
                Some(repaired) => {
                    refined = repaired;
                    used_ids.insert(forced_id.clone());
                }
                None => violations.push(format!(
                    "must-have place {forced_id} could not be scheduled on day {day_index}"
                )),
            }
        }

        let last_visit_point = refined.last().map(|v| {
            places_by_id
                .get(&v.place_id)
                .map(|p| p.point)
                .unwrap_or(day_anchor)
        });
        if story.accommodation.is_none() {
            anchor = last_visit_point.unwrap_or(anchor);
        }

        global_used.extend(used_ids);

        days.push(DayPlan {
            day_index,
            date,
            visits: refined,
            accommodation: story.accommodation.clone(),
        });
    }

    for term in &story.must_not {
        for day in &days {
            for visit in &day.visits {
                if let Some(place) = places_by_id.get(&visit.place_id) {
                    if matches_term(term, place) {
                        violations.push(format!(
                            "place {} matches a must-not constraint but was scheduled",
                            place.id
                        ));
                    }
                }
            }
        }
    }

    let itinerary = Itinerary {
        days,
        version: 1,
        truncated: false,
    };

    if violations.is_empty() {
        Ok(PlanOutcome::Feasible(itinerary))
    } else {
        Ok(PlanOutcome::NeedsDecision {
            violations,
            partial: itinerary,
        })
    }
}
