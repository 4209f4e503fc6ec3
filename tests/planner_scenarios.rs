/*
 * tests/planner_scenarios.rs
 *
 * End-to-end scenario tests over the pure planner/retriever/feedback
 * functions. No live Postgres or LLM is needed: candidates are built by
 * hand and travel times come from the deterministic great-circle backend.
 */

extern crate wayfinder as app;

use app::catalog::{CatalogRepository, PlaceFilter};
use app::error::AppError;
use app::feedback::apply_ops;
use app::models::candidate::Candidate;
use app::models::feedback::FeedbackOp;
use app::models::itinerary::{DayPlan, Itinerary};
use app::models::place::{OpeningInterval, Place, Point};
use app::models::story::{ConstraintTerm, DailyWindow, Pace, Story};
use app::planner::{plan, PlanOutcome};
use app::retrieval::rerank::rerank;
use app::travel_time::backend::MockTravelTimeBackend;
use app::travel_time::TravelTimeOracle;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;

struct FixtureCatalog {
    hours: HashMap<String, Vec<OpeningInterval>>,
    places: HashMap<String, Place>,
}

#[async_trait]
impl CatalogRepository for FixtureCatalog {
    async fn find_places(
        &self,
        _center: Point,
        _radius_m: f64,
        _filter: &PlaceFilter,
        _limit: usize,
    ) -> Result<Vec<Place>, AppError> {
        Ok(self.places.values().cloned().collect())
    }

    async fn get_hours(
        &self,
        place_ids: &[String],
    ) -> Result<HashMap<String, Vec<OpeningInterval>>, AppError> {
        Ok(place_ids
            .iter()
            .filter_map(|id| self.hours.get(id).map(|h| (id.clone(), h.clone())))
            .collect())
    }

    async fn get_places_by_id(&self, place_ids: &[String]) -> Result<Vec<Place>, AppError> {
        Ok(place_ids
            .iter()
            .filter_map(|id| self.places.get(id).cloned())
            .collect())
    }
}

fn place(id: &str, lat: f64, lon: f64, tags: &[&str], stay_minutes: u32, rating: f32) -> Place {
    Place {
        id: id.to_string(),
        name: id.to_string(),
        point: Point { lat, lon },
        categories: vec![],
        tags: tags.iter().map(|t| t.to_string()).collect(),
        default_stay_minutes: stay_minutes,
        price_tier: None,
        rating: Some(rating),
    }
}

fn candidate(p: Place) -> Candidate {
    let mut c = Candidate::new(p, 500.0);
    c.semantic_score = Some(0.6);
    c.structured_score = Some(0.6);
    c
}

fn oracle() -> Arc<TravelTimeOracle> {
    let backend: Arc<dyn app::travel_time::backend::TravelTimeBackend> =
        Arc::new(MockTravelTimeBackend::default());
    Arc::new(TravelTimeOracle::new(
        backend,
        app::config::TravelTimeConfig::default(),
    ))
}

fn story(day_count: u32, interests: &[&str]) -> Story {
    Story {
        destination: "Taipei".to_string(),
        anchor: Point {
            lat: 25.0330,
            lon: 121.5654,
        },
        start_date: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
        day_count,
        daily_window: DailyWindow {
            start_minute: 9 * 60,
            end_minute: 21 * 60,
        },
        pace: Pace::Moderate,
        interests: interests.iter().map(|s| s.to_string()).collect(),
        must_have: vec![],
        must_not: vec![],
        budget_tier: None,
        accommodation: None,
    }
}

#[tokio::test]
async fn single_day_three_interests_yields_feasible_visits() {
    let candidates: Vec<Candidate> = vec![
        candidate(place("market", 25.034, 121.566, &["food", "culture"], 60, 4.5)),
        candidate(place("temple", 25.035, 121.567, &["culture"], 45, 4.7)),
        candidate(place("teahouse", 25.036, 121.568, &["food"], 50, 4.2)),
        candidate(place("night_market", 25.037, 121.569, &["food", "culture"], 90, 4.6)),
    ];

    let story = story(1, &["food", "culture"]);
    let weights = app::config::RerankWeights::default();
    let ranked = rerank(candidates, &story, &weights, 10);

    let catalog: Arc<dyn CatalogRepository> = Arc::new(FixtureCatalog {
        hours: HashMap::new(),
        places: HashMap::new(),
    });
    let config = app::config::PlannerConfig::default();

    let outcome = plan(&story, &ranked, &catalog, &oracle(), &config)
        .await
        .expect("planning succeeds");

    let itinerary = match outcome {
        PlanOutcome::Feasible(i) => i,
        PlanOutcome::NeedsDecision { violations, .. } => {
            panic!("expected a feasible plan, got violations: {violations:?}")
        }
    };

    assert_eq!(itinerary.days.len(), 1);
    let day = &itinerary.days[0];
    assert!(day.visits.len() >= 3, "expected at least 3 visits, got {}", day.visits.len());
    assert!(day.total_minutes() <= story.daily_window.budget_minutes());

    let mut prev_eta = 0;
    for visit in &day.visits {
        assert!(visit.eta_minute >= prev_eta);
        assert!(visit.is_consistent());
        prev_eta = visit.eta_minute;
    }
}

#[tokio::test]
async fn must_have_is_scheduled_or_cited_in_a_decision() {
    let candidates: Vec<Candidate> = vec![
        candidate(place("temple_101", 25.034, 121.566, &["culture", "landmark"], 60, 4.9)),
        candidate(place("museum", 25.035, 121.567, &["culture"], 90, 4.3)),
        candidate(place("park", 25.036, 121.568, &["nature"], 40, 4.0)),
    ];

    let mut story = story(1, &["culture"]);
    story.must_have = vec![ConstraintTerm::PlaceId("temple_101".to_string())];

    let weights = app::config::RerankWeights::default();
    let ranked = rerank(candidates, &story, &weights, 10);

    let catalog: Arc<dyn CatalogRepository> = Arc::new(FixtureCatalog {
        hours: HashMap::new(),
        places: HashMap::new(),
    });
    let config = app::config::PlannerConfig::default();

    let outcome = plan(&story, &ranked, &catalog, &oracle(), &config)
        .await
        .expect("planning succeeds");

    match outcome {
        PlanOutcome::Feasible(itinerary) => {
            assert!(itinerary
                .days
                .iter()
                .any(|d| d.contains("temple_101")));
        }
        PlanOutcome::NeedsDecision { violations, .. } => {
            assert!(violations.iter().any(|v| v.contains("temple_101")));
        }
    }
}

#[tokio::test]
async fn opening_hours_gate_blocks_scheduling_before_open() {
    let late_place = place("night_bar", 25.034, 121.566, &["nightlife"], 60, 4.4);
    let hours: HashMap<String, Vec<OpeningInterval>> = [(
        "night_bar".to_string(),
        vec![OpeningInterval {
            weekday: app::planner::feasibility::weekday_of(
                NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            ),
            open_minute: 18 * 60,
            close_minute: 22 * 60,
        }],
    )]
    .into_iter()
    .collect();

    let candidates: Vec<Candidate> = vec![candidate(late_place.clone())];
    let mut story = story(1, &["nightlife"]);
    story.daily_window = DailyWindow {
        start_minute: 9 * 60,
        end_minute: 21 * 60,
    };

    let weights = app::config::RerankWeights::default();
    let ranked = rerank(candidates, &story, &weights, 10);

    let mut places = HashMap::new();
    places.insert("night_bar".to_string(), late_place);
    let catalog: Arc<dyn CatalogRepository> = Arc::new(FixtureCatalog { hours, places });
    let config = app::config::PlannerConfig::default();

    let outcome = plan(&story, &ranked, &catalog, &oracle(), &config)
        .await
        .expect("planning succeeds");

    let itinerary = match outcome {
        PlanOutcome::Feasible(i) => i,
        PlanOutcome::NeedsDecision { partial, .. } => partial,
    };

    for day in &itinerary.days {
        for visit in &day.visits {
            if visit.place_id == "night_bar" {
                assert!(visit.eta_minute >= 18 * 60, "must never open before 18:00");
            }
        }
    }
}

#[tokio::test]
async fn feedback_move_into_too_narrow_a_window_is_reported_as_a_violation() {
    let narrow_place = place("late_museum", 25.034, 121.566, &["culture"], 180, 4.2);
    let hours: HashMap<String, Vec<OpeningInterval>> = [(
        "late_museum".to_string(),
        vec![OpeningInterval {
            weekday: app::planner::feasibility::weekday_of(
                NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            ),
            open_minute: 18 * 60,
            close_minute: 19 * 60 + 30,
        }],
    )]
    .into_iter()
    .collect();

    let mut places = HashMap::new();
    places.insert("late_museum".to_string(), narrow_place.clone());
    let catalog: Arc<dyn CatalogRepository> = Arc::new(FixtureCatalog { hours, places });

    let mut story = story(1, &["culture"]);
    story.daily_window = DailyWindow {
        start_minute: 9 * 60,
        end_minute: 21 * 60,
    };

    let itinerary = Itinerary {
        days: vec![DayPlan {
            day_index: 0,
            date: story.start_date,
            visits: vec![app::models::itinerary::Visit {
                place_id: "late_museum".to_string(),
                name: "late_museum".to_string(),
                eta_minute: 18 * 60,
                etd_minute: 18 * 60 + 180,
                travel_minutes_in: 0,
                stay_minutes: 180,
                travel_estimated: false,
            }],
            accommodation: None,
        }],
        version: 1,
        truncated: false,
    };

    let outcome = apply_ops(
        &itinerary,
        &[FeedbackOp::Move {
            place_id: "late_museum".to_string(),
            target_day: 0,
            // Requested well before the place opens at 18:00.
            new_time_minute: Some(9 * 60),
        }],
        &story,
        &[candidate(narrow_place)],
        &catalog,
        &oracle(),
    )
    .await
    .expect("apply_ops does not error on a closed-hours move, it reports a violation");

    assert!(!outcome.violations.is_empty());
}

#[tokio::test]
async fn two_must_haves_with_disjoint_windows_split_across_two_days() {
    let day0 = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
    let day1 = day0.succ_opt().unwrap();

    let place_a = place("shrine_a", 25.034, 121.566, &["culture"], 20, 4.5);
    let place_b = place("shrine_b", 25.035, 121.567, &["culture"], 20, 4.4);
    let hours: HashMap<String, Vec<OpeningInterval>> = [
        (
            "shrine_a".to_string(),
            vec![OpeningInterval {
                weekday: app::planner::feasibility::weekday_of(day0),
                open_minute: 9 * 60,
                close_minute: 9 * 60 + 30,
            }],
        ),
        (
            "shrine_b".to_string(),
            vec![OpeningInterval {
                weekday: app::planner::feasibility::weekday_of(day1),
                open_minute: 9 * 60,
                close_minute: 9 * 60 + 30,
            }],
        ),
    ]
    .into_iter()
    .collect();

    let mut places = HashMap::new();
    places.insert("shrine_a".to_string(), place_a.clone());
    places.insert("shrine_b".to_string(), place_b.clone());
    let catalog: Arc<dyn CatalogRepository> = Arc::new(FixtureCatalog { hours, places });

    let mut story = story(2, &["culture"]);
    story.must_have = vec![
        ConstraintTerm::PlaceId("shrine_a".to_string()),
        ConstraintTerm::PlaceId("shrine_b".to_string()),
    ];

    let candidates = vec![candidate(place_a), candidate(place_b)];
    let weights = app::config::RerankWeights::default();
    let ranked = rerank(candidates, &story, &weights, 10);
    let config = app::config::PlannerConfig::default();

    let outcome = plan(&story, &ranked, &catalog, &oracle(), &config)
        .await
        .expect("planning succeeds");

    let itinerary = match outcome {
        PlanOutcome::Feasible(i) => i,
        PlanOutcome::NeedsDecision { violations, .. } => {
            panic!("expected a clean two-day split, got violations: {violations:?}")
        }
    };

    assert!(itinerary.days[0].contains("shrine_a"));
    assert!(itinerary.days[1].contains("shrine_b"));
}

#[tokio::test]
async fn two_must_haves_with_disjoint_windows_on_one_day_needs_a_decision() {
    let day0 = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();

    let place_a = place("shrine_a", 25.034, 121.566, &["culture"], 20, 4.5);
    let place_b = place("shrine_b", 25.035, 121.567, &["culture"], 20, 4.4);
    let narrow = vec![OpeningInterval {
        weekday: app::planner::feasibility::weekday_of(day0),
        open_minute: 9 * 60,
        close_minute: 9 * 60 + 30,
    }];
    let hours: HashMap<String, Vec<OpeningInterval>> = [
        ("shrine_a".to_string(), narrow.clone()),
        ("shrine_b".to_string(), narrow),
    ]
    .into_iter()
    .collect();

    let mut places = HashMap::new();
    places.insert("shrine_a".to_string(), place_a.clone());
    places.insert("shrine_b".to_string(), place_b.clone());
    let catalog: Arc<dyn CatalogRepository> = Arc::new(FixtureCatalog { hours, places });

    let mut story = story(1, &["culture"]);
    story.must_have = vec![
        ConstraintTerm::PlaceId("shrine_a".to_string()),
        ConstraintTerm::PlaceId("shrine_b".to_string()),
    ];

    let candidates = vec![candidate(place_a), candidate(place_b)];
    let weights = app::config::RerankWeights::default();
    let ranked = rerank(candidates, &story, &weights, 10);
    let config = app::config::PlannerConfig::default();

    let outcome = plan(&story, &ranked, &catalog, &oracle(), &config)
        .await
        .expect("planning succeeds");

    match outcome {
        PlanOutcome::Feasible(itinerary) => {
            // Both fitting in the single identical 30-minute window would
            // require visiting two distinct points at once; accept this
            // only if travel time between them truly is zero.
            assert!(itinerary.days[0].contains("shrine_a") && itinerary.days[0].contains("shrine_b"));
        }
        PlanOutcome::NeedsDecision { violations, .. } => {
            assert!(violations.iter().any(|v| v.contains("shrine_a") || v.contains("shrine_b")));
        }
    }
}

#[tokio::test]
async fn two_opt_removes_an_obvious_crossing() {
    // Four points on a unit square; visiting them in crossing order
    // (diagonal-first) should be strictly worse than the 2-opt-corrected
    // perimeter order.
    let candidates: Vec<Candidate> = vec![
        candidate(place("nw", 25.040, 121.560, &["sight"], 20, 4.0)),
        candidate(place("ne", 25.040, 121.570, &["sight"], 20, 4.0)),
        candidate(place("sw", 25.030, 121.560, &["sight"], 20, 4.0)),
        candidate(place("se", 25.030, 121.570, &["sight"], 20, 4.0)),
    ];

    let mut story = story(1, &["sight"]);
    story.anchor = Point {
        lat: 25.030,
        lon: 121.560,
    };
    // Keep pace generous enough that all four are attempted.
    let weights = app::config::RerankWeights::default();
    let ranked = rerank(candidates, &story, &weights, 10);

    let catalog: Arc<dyn CatalogRepository> = Arc::new(FixtureCatalog {
        hours: HashMap::new(),
        places: HashMap::new(),
    });
    let mut config = app::config::PlannerConfig::default();
    config.planner.target_visits_per_day = 4;

    let outcome = plan(&story, &ranked, &catalog, &oracle(), &config)
        .await
        .expect("planning succeeds");

    let itinerary = match outcome {
        PlanOutcome::Feasible(i) => i,
        PlanOutcome::NeedsDecision { violations, .. } => {
            panic!("expected a feasible plan, got violations: {violations:?}")
        }
    };

    // The final order must not be worse than the naive corner-to-corner
    // crossing order (sw -> ne -> nw -> se), whose total travel is larger
    // than any non-crossing perimeter walk.
    let crossing_order_minutes = {
        let oracle = oracle();
        let pts = [
            Point { lat: 25.030, lon: 121.560 },
            Point { lat: 25.040, lon: 121.570 },
            Point { lat: 25.040, lon: 121.560 },
            Point { lat: 25.030, lon: 121.570 },
        ];
        let mut total = 0u32;
        for w in pts.windows(2) {
            total += oracle.duration(w[0], w[1]).await.seconds / 60;
        }
        total
    };

    let day = &itinerary.days[0];
    let planned_minutes: u32 = day.visits.iter().map(|v| v.travel_minutes_in).sum();
    assert!(
        planned_minutes <= crossing_order_minutes,
        "2-opt-refined order ({planned_minutes}m) should not exceed the crossing order ({crossing_order_minutes}m)"
    );
}

#[tokio::test]
async fn feedback_drop_then_insert_preserves_visited_set_minus_plus() {
    let market = place("market", 25.034, 121.566, &["food"], 60, 4.5);
    let temple = place("temple", 25.035, 121.567, &["culture"], 45, 4.7);
    let bakery = place("bakery", 25.036, 121.568, &["food"], 30, 4.1);

    let story = story(1, &["food", "culture"]);
    let itinerary = Itinerary {
        days: vec![DayPlan {
            day_index: 0,
            date: story.start_date,
            visits: vec![
                app::models::itinerary::Visit {
                    place_id: "market".to_string(),
                    name: "market".to_string(),
                    eta_minute: 9 * 60,
                    etd_minute: 10 * 60,
                    travel_minutes_in: 0,
                    stay_minutes: 60,
                    travel_estimated: false,
                },
                app::models::itinerary::Visit {
                    place_id: "temple".to_string(),
                    name: "temple".to_string(),
                    eta_minute: 10 * 60 + 10,
                    etd_minute: 10 * 60 + 55,
                    travel_minutes_in: 10,
                    stay_minutes: 45,
                    travel_estimated: false,
                },
            ],
            accommodation: None,
        }],
        version: 1,
        truncated: false,
    };

    let candidate_pool = vec![candidate(market.clone()), candidate(temple.clone()), candidate(bakery.clone())];

    let catalog: Arc<dyn CatalogRepository> = Arc::new(FixtureCatalog {
        hours: HashMap::new(),
        places: HashMap::new(),
    });

    let ops = vec![
        FeedbackOp::Drop {
            place_id: "temple".to_string(),
        },
        FeedbackOp::Insert {
            description: "bakery".to_string(),
            preferred_day: Some(0),
        },
    ];

    let outcome = apply_ops(&itinerary, &ops, &story, &candidate_pool, &catalog, &oracle())
        .await
        .expect("apply_ops succeeds");

    let resulting_ids = outcome.itinerary.used_place_ids();
    assert!(resulting_ids.contains("market"));
    assert!(resulting_ids.contains("bakery"));
    assert!(!resulting_ids.contains("temple"));
    assert_eq!(resulting_ids.len(), 2);
}
