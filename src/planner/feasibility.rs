/*
 * src/planner/feasibility.rs
 *
 * File for planner feasibility predicates
 *
 * Purpose:
 *   Given a candidate's opening hours and a day's time budget, decide
 *   whether a visit can be scheduled at a given arrival time.
 */

use std::collections::HashMap;

use crate::models::place::OpeningInterval;
use crate::models::story::DailyWindow;

/// Weekday 0=Sunday, matching the storage convention assumed in
/// SPEC_FULL.md's open questions.
pub fn weekday_of(date: chrono::NaiveDate) -> u8 {
    use chrono::Datelike;
    date.weekday().num_days_from_sunday() as u8
}

/// Returns the feasible `(eta, etd)` window for arriving at `earliest_arrival`
/// and staying `stay_minutes`, or None if no opening interval accommodates it
/// within the day's budget.
pub fn feasible_window(
    hours: &HashMap<String, Vec<OpeningInterval>>,
    place_id: &str,
    weekday: u8,
    earliest_arrival: u32,
    stay_minutes: u32,
    daily_window: DailyWindow,
) -> Option<(u32, u32)> {
    let intervals = hours.get(place_id)?;
    let mut best: Option<(u32, u32)> = None;

    for interval in intervals.iter().filter(|i| i.weekday == weekday) {
        let eta = earliest_arrival.max(interval.open_minute);
        let etd = eta + stay_minutes;
        if interval.contains(eta, etd) && eta >= daily_window.start_minute && etd <= daily_window.end_minute {
            match best {
                Some((_, prev_etd)) if prev_etd <= etd => {}
                _ => best = Some((eta, etd)),
            }
        }
    }

    best
}

/// Whether there are no declared hours at all for a place (treated as
/// always-open, e.g. a park or public square).
pub fn has_no_declared_hours(hours: &HashMap<String, Vec<OpeningInterval>>, place_id: &str) -> bool {
    !hours.contains_key(place_id)
}
