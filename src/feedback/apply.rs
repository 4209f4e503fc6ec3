/*
 * src/feedback/apply.rs
 *
 * File for transactional application of feedback operations
 *
 * Purpose:
 *   Apply a list of typed operations to produce a candidate next
 *   itinerary version; each day touched is re-laid out with `timeline`
 *   so times stay consistent. The prior itinerary is never mutated in
 *   place — the caller decides whether to keep the result.
 */

use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::CatalogRepository;
use crate::error::AppError;
use crate::models::candidate::Candidate;
use crate::models::itinerary::{DayPlan, Itinerary};
use crate::models::feedback::FeedbackOp;
use crate::models::place::{Place, Point};
use crate::models::story::{DailyWindow, Story};
use crate::planner::feasibility::weekday_of;
use crate::planner::local_search::two_opt_refine;
use crate::planner::repair::substitute_candidate;
use crate::planner::timeline::{retime, TimelineInputs};
use crate::travel_time::TravelTimeOracle;

const REORDER_ITERATION_CAP: usize = 64;

pub struct ApplyOutcome {
    pub itinerary: Itinerary,
    pub applied: Vec<String>,
    pub violations: Vec<String>,
}

async fn relay_day(
    day: &DayPlan,
    anchor: Point,
    places_by_id: &HashMap<String, Place>,
    hours: &std::collections::HashMap<String, Vec<crate::models::place::OpeningInterval>>,
    daily_window: DailyWindow,
    oracle: &Arc<TravelTimeOracle>,
) -> Option<Vec<crate::models::itinerary::Visit>> {
    let order: Option<Vec<&Place>> = day
        .visits
        .iter()
        .map(|v| places_by_id.get(&v.place_id))
        .collect();
    let order = order?;
    let stay_minutes: HashMap<String, u32> = day
        .visits
        .iter()
        .map(|v| (v.place_id.clone(), v.stay_minutes))
        .collect();
    let weekday = weekday_of(day.date);
    let inputs = TimelineInputs {
        hours,
        weekday,
        daily_window,
    };
    retime(anchor, &order, &stay_minutes, oracle, &inputs).await
}

pub async fn apply_ops(
    itinerary: &Itinerary,
    ops: &[FeedbackOp],
    story: &Story,
    candidate_pool: &[Candidate],
    catalog: &Arc<dyn CatalogRepository>,
    oracle: &Arc<TravelTimeOracle>,
) -> Result<ApplyOutcome, AppError> {
    let mut days = itinerary.days.clone();
    let mut places_by_id: HashMap<String, Place> =
        candidate_pool.iter().map(|c| (c.place.id.clone(), c.place.clone())).collect();
    let mut reorder_days: std::collections::HashSet<u32> = std::collections::HashSet::new();

    let existing_ids: Vec<String> = days
        .iter()
        .flat_map(|d| d.visits.iter().map(|v| v.place_id.clone()))
        .filter(|id| !places_by_id.contains_key(id))
        .collect();
    if !existing_ids.is_empty() {
        for place in catalog.get_places_by_id(&existing_ids).await? {
            places_by_id.insert(place.id.clone(), place);
        }
    }

    let mut applied = Vec::new();
    let mut violations = Vec::new();

    for op in ops {
        match op {
            FeedbackOp::Drop { place_id } => {
                if let Some(day) = days.iter_mut().find(|d| d.contains(place_id)) {
                    day.visits.retain(|v| &v.place_id != place_id);
                    applied.push(format!("dropped {place_id}"));
                } else {
                    violations.push(format!("{place_id} not found in itinerary"));
                }
            }
            FeedbackOp::Insert { description, preferred_day } => {
                let used = itinerary.used_place_ids();
                let best = candidate_pool.iter().find(|c| {
                    !used.contains(&c.place.id)
                        && (c.place.name.to_lowercase().contains(&description.to_lowercase())
                            || c
                                .place
                                .tags
                                .iter()
                                .any(|t| description.to_lowercase().contains(&t.to_lowercase())))
                });
                match best {
                    Some(candidate) => {
                        let day_index = preferred_day
                            .unwrap_or(0)
                            .min(days.len().saturating_sub(1) as u32);
                        if let Some(day) = days.get_mut(day_index as usize) {
                            day.visits.push(crate::models::itinerary::Visit {
                                place_id: candidate.place.id.clone(),
                                name: candidate.place.name.clone(),
                                eta_minute: 0,
                                etd_minute: 0,
                                travel_minutes_in: 0,
                                stay_minutes: candidate.place.default_stay_minutes,
                                travel_estimated: false,
                            });
                            places_by_id.insert(candidate.place.id.clone(), candidate.place.clone());
                            applied.push(format!("inserted {}", candidate.place.id));
                        }
                    }
                    None => violations.push(format!("no candidate matches '{description}'")),
                }
            }
            FeedbackOp::Move { place_id, target_day, new_time_minute } => {
                let mut moved_visit = None;
                for day in days.iter_mut() {
                    if day.contains(place_id) {
                        let idx = day.visits.iter().position(|v| &v.place_id == place_id).unwrap();
                        moved_visit = Some(day.visits.remove(idx));
                        break;
                    }
                }
                match moved_visit {
                    Some(visit) => {
                        if let Some(day) = days.get_mut(*target_day as usize) {
                            if let Some(requested) = new_time_minute {
                                let weekday = weekday_of(day.date);
                                let place_hours = catalog
                                    .get_hours(std::slice::from_ref(place_id))
                                    .await?;
                                let requested_end = requested + visit.stay_minutes;
                                let fits = place_hours
                                    .get(place_id)
                                    .map(|intervals| {
                                        intervals
                                            .iter()
                                            .any(|iv| iv.weekday == weekday && iv.contains(*requested, requested_end))
                                    })
                                    .unwrap_or(true);
                                if !fits {
                                    violations.push(format!(
                                        "{place_id} cannot be moved to {:02}:{:02} on day {target_day}, it is closed then",
                                        requested / 60,
                                        requested % 60
                                    ));
                                }
                            }
                            day.visits.push(visit);
                            applied.push(format!("moved {place_id} to day {target_day}"));
                        } else {
                            violations.push(format!("target day {target_day} does not exist"));
                        }
                    }
                    None => violations.push(format!("{place_id} not found in itinerary")),
                }
            }
            FeedbackOp::Swap { place_id_a, place_id_b } => {
                let loc_a = days.iter().position(|d| d.contains(place_id_a));
                let loc_b = days.iter().position(|d| d.contains(place_id_b));
                match (loc_a, loc_b) {
                    (Some(da), Some(db)) if da != db => {
                        let idx_a = days[da].visits.iter().position(|v| &v.place_id == place_id_a).unwrap();
                        let idx_b = days[db].visits.iter().position(|v| &v.place_id == place_id_b).unwrap();
                        let visit_a = days[da].visits.remove(idx_a);
                        let visit_b = days[db].visits.remove(idx_b);
                        days[da].visits.push(visit_b);
                        days[db].visits.push(visit_a);
                        applied.push(format!("swapped {place_id_a} and {place_id_b}"));
                    }
                    (Some(da), Some(_)) => {
                        let idx_a = days[da].visits.iter().position(|v| &v.place_id == place_id_a).unwrap();
                        let idx_b = days[da].visits.iter().position(|v| &v.place_id == place_id_b).unwrap();
                        days[da].visits.swap(idx_a, idx_b);
                        applied.push(format!("swapped {place_id_a} and {place_id_b}"));
                    }
                    _ => violations.push(format!("{place_id_a} or {place_id_b} not found")),
                }
            }
            FeedbackOp::Replace { place_id, hint_tags } => {
                let used = itinerary.used_place_ids();
                let blocking = places_by_id.get(place_id).cloned();
                let replacement = candidate_pool.iter().find(|c| {
                    !used.contains(&c.place.id)
                        && c.place.id != *place_id
                        && c.place.tags.iter().any(|t| hint_tags.contains(t))
                });
                match (blocking, replacement) {
                    (Some(_), Some(candidate)) => {
                        if let Some(day) = days.iter_mut().find(|d| d.contains(place_id)) {
                            if let Some(visit) = day.visits.iter_mut().find(|v| &v.place_id == place_id) {
                                visit.place_id = candidate.place.id.clone();
                                visit.name = candidate.place.name.clone();
                                visit.stay_minutes = candidate.place.default_stay_minutes;
                                places_by_id.insert(candidate.place.id.clone(), candidate.place.clone());
                                applied.push(format!("replaced {place_id} with {}", candidate.place.id));
                            }
                        }
                    }
                    _ => violations.push(format!("could not replace {place_id}")),
                }
            }
            FeedbackOp::Reorder { day_index } => {
                if days.get(*day_index as usize).is_some() {
                    reorder_days.insert(*day_index);
                    applied.push(format!("reordered day {day_index}"));
                } else {
                    violations.push(format!("day {day_index} does not exist"));
                }
            }
        }
    }

    let touched_ids: Vec<String> = days
        .iter()
        .flat_map(|d| d.visits.iter().map(|v| v.place_id.clone()))
        .collect();
    let hours = catalog.get_hours(&touched_ids).await?;

    let mut relaid_days = Vec::with_capacity(days.len());
    let mut anchor = story.anchor;
    for day in &days {
        if day.visits.is_empty() {
            relaid_days.push(day.clone());
            continue;
        }
        match relay_day(day, anchor, &places_by_id, &hours, story.daily_window, oracle).await {
            Some(visits) => {
                let visits = if reorder_days.contains(&day.day_index) {
                    let stay_minutes: HashMap<String, u32> = visits
                        .iter()
                        .map(|v| (v.place_id.clone(), v.stay_minutes))
                        .collect();
                    let weekday = weekday_of(day.date);
                    let inputs = TimelineInputs {
                        hours: &hours,
                        weekday,
                        daily_window: story.daily_window,
                    };
                    two_opt_refine(
                        visits,
                        anchor,
                        &places_by_id,
                        &stay_minutes,
                        oracle,
                        &inputs,
                        REORDER_ITERATION_CAP,
                    )
                    .await
                } else {
                    visits
                };
                anchor = places_by_id
                    .get(&visits.last().unwrap().place_id)
                    .map(|p| p.point)
                    .unwrap_or(anchor);
                relaid_days.push(DayPlan {
                    day_index: day.day_index,
                    date: day.date,
                    visits,
                    accommodation: day.accommodation.clone(),
                });
            }
            None => {
                let weekday = weekday_of(day.date);
                let inputs = TimelineInputs {
                    hours: &hours,
                    weekday,
                    daily_window: story.daily_window,
                };
                let stay_minutes: HashMap<String, u32> = day
                    .visits
                    .iter()
                    .map(|v| (v.place_id.clone(), v.stay_minutes))
                    .collect();
                let used_ids: std::collections::HashSet<String> =
                    touched_ids.iter().cloned().collect();

                let mut repaired = None;
                for blocking in &day.visits {
                    let Some(blocking_place) = places_by_id.get(&blocking.place_id) else {
                        continue;
                    };
                    if let Some(visits) = substitute_candidate(
                        &day.visits,
                        &blocking.place_id,
                        blocking_place,
                        candidate_pool,
                        &used_ids,
                        anchor,
                        &places_by_id,
                        &stay_minutes,
                        oracle,
                        &inputs,
                    )
                    .await
                    {
                        repaired = Some(visits);
                        break;
                    }
                }

                match repaired {
                    Some(visits) => {
                        anchor = places_by_id
                            .get(&visits.last().unwrap().place_id)
                            .map(|p| p.point)
                            .unwrap_or(anchor);
                        applied.push(format!("substituted a blocking candidate on day {}", day.day_index));
                        relaid_days.push(DayPlan {
                            day_index: day.day_index,
                            date: day.date,
                            visits,
                            accommodation: day.accommodation.clone(),
                        });
                    }
                    None => {
                        violations.push(format!(
                            "day {} is no longer feasible after edits",
                            day.day_index
                        ));
                        relaid_days.push(day.clone());
                    }
                }
            }
        }
    }

    let new_itinerary = Itinerary {
        days: relaid_days,
        version: itinerary.version + 1,
        truncated: itinerary.truncated,
    };

    Ok(ApplyOutcome {
        itinerary: new_itinerary,
        applied,
        violations,
    })
}
