/*
 * src/planner/greedy.rs
 *
 * File for greedy per-day itinerary construction
 *
 * Purpose:
 *   Repeatedly pick the feasible unused candidate with the highest
 *   marginal utility (score minus travel and wait penalties) until no
 *   feasible candidate remains or the pace target is hit with diminishing
 *   returns.
 */

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::config::PlannerTuning;
use crate::models::candidate::Candidate;
use crate::models::itinerary::Visit;
use crate::models::place::{OpeningInterval, Point};
use crate::models::story::DailyWindow;
use crate::planner::feasibility::feasible_window;
use crate::travel_time::TravelTimeOracle;

pub struct DayConstruction {
    pub visits: Vec<Visit>,
    pub used_ids: HashSet<String>,
}

/// Greedily builds one day's visit sequence.
///
/// `forced` lists must-have candidates this day should try to include; they
/// are attempted before the general marginal-utility scan so none of them
/// loses a slot to a higher-scoring optional candidate. More than one id may
/// be forced onto the same day, in which case they compete for slots against
/// each other like any other candidate once prioritized.
pub async fn construct_day(
    available: &[Candidate],
    already_used: &HashSet<String>,
    anchor: Point,
    forced: &[String],
    weekday: u8,
    daily_window: DailyWindow,
    hours: &HashMap<String, Vec<OpeningInterval>>,
    tuning: &PlannerTuning,
    oracle: &Arc<TravelTimeOracle>,
) -> DayConstruction {
    let mut used_ids: HashSet<String> = HashSet::new();
    let mut visits = Vec::new();
    let mut cursor = anchor;
    let mut t = daily_window.start_minute;

    let mut candidate_order: Vec<&Candidate> = available
        .iter()
        .filter(|c| !already_used.contains(&c.place.id))
        .collect();

    if !forced.is_empty() {
        candidate_order.sort_by_key(|c| if forced.iter().any(|id| *id == c.place.id) { 0 } else { 1 });
    }

    loop {
        let mut best: Option<(&Candidate, Visit, f64)> = None;

        for candidate in &candidate_order {
            if used_ids.contains(&candidate.place.id) {
                continue;
            }

            let travel = oracle.duration(cursor, candidate.place.point).await;
            let travel_minutes = travel.seconds / 60;
            let earliest_arrival = t + travel_minutes;
            let stay = candidate.place.default_stay_minutes;

            let window = if hours.contains_key(&candidate.place.id) {
                feasible_window(
                    hours,
                    &candidate.place.id,
                    weekday,
                    earliest_arrival,
                    stay,
                    daily_window,
                )
            } else {
                let etd = earliest_arrival + stay;
                if etd <= daily_window.end_minute {
                    Some((earliest_arrival, etd))
                } else {
                    None
                }
            };

            let Some((eta, etd)) = window else { continue };
            let wait_minutes = eta.saturating_sub(earliest_arrival);

            let mut utility = candidate.final_score
                - tuning.lambda_travel * travel_minutes as f64
                - tuning.mu_wait * wait_minutes as f64;

            if forced.iter().any(|id| *id == candidate.place.id) {
                utility += 1000.0;
            }

            let visit = Visit {
                place_id: candidate.place.id.clone(),
                name: candidate.place.name.clone(),
                eta_minute: eta,
                etd_minute: etd,
                travel_minutes_in: travel_minutes,
                stay_minutes: stay,
                travel_estimated: travel.estimated,
            };

            match &best {
                Some((_, _, best_utility)) if *best_utility >= utility => {}
                _ => best = Some((candidate, visit, utility)),
            }
        }

        let Some((candidate, visit, utility)) = best else { break };

        let hit_target = visits.len() as u32 >= tuning.target_visits_per_day;
        if hit_target && utility < tuning.marginal_utility_floor {
            break;
        }

        cursor = candidate.place.point;
        t = visit.etd_minute;
        used_ids.insert(candidate.place.id.clone());
        visits.push(visit);
    }

    DayConstruction { visits, used_ids }
}
