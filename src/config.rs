/*
 * src/config.rs
 *
 * File for application configuration
 *
 * Purpose:
 *   Layer compiled-in defaults, an optional config/default.toml, and
 *   WAYFINDER_-prefixed environment variables into a single config table.
 *   Secrets and connection strings (DATABASE_URL, GOOGLE_MAPS_API_KEY,
 *   OPENAI_API_KEY, BIND_ADDRESS) are read directly from the environment via
 *   dotenvy, matching how those are handled elsewhere in this codebase.
 */

use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{AppError, PrivateError};
use crate::models::story::Pace;

/// Weights for the reranker's linear scoring function.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RerankWeights {
    pub alpha_semantic: f64,
    pub beta_rating: f64,
    pub gamma_distance: f64,
    pub delta_tag_overlap: f64,
    pub epsilon_pace_fit: f64,
    pub zeta_must_have: f64,
    pub eta_must_not: f64,
}

impl Default for RerankWeights {
    fn default() -> Self {
        RerankWeights {
            alpha_semantic: 0.35,
            beta_rating: 0.2,
            gamma_distance: 0.15,
            delta_tag_overlap: 0.15,
            epsilon_pace_fit: 0.1,
            zeta_must_have: 1.0,
            eta_must_not: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    pub structured_limit: usize,
    pub semantic_limit: usize,
    pub top_k: usize,
    pub branch_timeout_ms: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        RetrievalConfig {
            structured_limit: 128,
            semantic_limit: 128,
            top_k: 64,
            branch_timeout_ms: 3_000,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PlannerTuning {
    pub lambda_travel: f64,
    pub mu_wait: f64,
    pub marginal_utility_floor: f64,
    pub two_opt_iteration_cap: usize,
    pub repair_ladder_depth: usize,
    pub target_visits_per_day: u32,
}

impl Default for PlannerTuning {
    fn default() -> Self {
        PlannerTuning {
            lambda_travel: 0.05,
            mu_wait: 0.03,
            marginal_utility_floor: 0.05,
            two_opt_iteration_cap: 64,
            repair_ladder_depth: 6,
            target_visits_per_day: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TravelTimeConfig {
    pub peak_multiplier: f64,
    pub cache_ttl_secs: u64,
    pub cache_capacity: usize,
    pub fallback_inflation: f64,
}

impl Default for TravelTimeConfig {
    fn default() -> Self {
        TravelTimeConfig {
            peak_multiplier: 1.0,
            cache_ttl_secs: 7 * 24 * 3600,
            cache_capacity: 50_000,
            fallback_inflation: 1.3,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DeadlineConfig {
    pub turn_deadline_ms: u64,
    pub extract_deadline_ms: u64,
    pub retrieve_deadline_ms: u64,
    pub plan_deadline_ms: u64,
}

impl Default for DeadlineConfig {
    fn default() -> Self {
        DeadlineConfig {
            turn_deadline_ms: 20_000,
            extract_deadline_ms: 5_000,
            retrieve_deadline_ms: 4_000,
            plan_deadline_ms: 8_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub rerank_weights: HashMap<Pace, RerankWeights>,
    pub retrieval: RetrievalConfig,
    pub planner: PlannerTuning,
    pub travel_time: TravelTimeConfig,
    pub deadlines: DeadlineConfig,
    pub default_daily_window: (u32, u32),
    pub max_day_count: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        let mut rerank_weights = HashMap::new();
        rerank_weights.insert(
            Pace::Relaxed,
            RerankWeights {
                beta_rating: 0.3,
                ..RerankWeights::default()
            },
        );
        rerank_weights.insert(Pace::Moderate, RerankWeights::default());
        rerank_weights.insert(
            Pace::Intensive,
            RerankWeights {
                delta_tag_overlap: 0.25,
                beta_rating: 0.1,
                ..RerankWeights::default()
            },
        );

        PlannerConfig {
            rerank_weights,
            retrieval: RetrievalConfig::default(),
            planner: PlannerTuning::default(),
            travel_time: TravelTimeConfig::default(),
            deadlines: DeadlineConfig::default(),
            default_daily_window: (9 * 60, 21 * 60),
            max_day_count: 14,
        }
    }
}

impl PlannerConfig {
    pub fn weights_for(&self, pace: Pace) -> RerankWeights {
        self.rerank_weights
            .get(&pace)
            .copied()
            .unwrap_or_default()
    }

    /// Loads defaults, then `config/default.toml` if present, then
    /// `WAYFINDER_`-prefixed environment overrides.
    pub fn load() -> Result<Self, AppError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("WAYFINDER").separator("__"))
            .build()
            .map_err(|e| AppError::from(PrivateError::Config(e.to_string())))?;

        // The layered source only ever overrides sub-tables that are present;
        // absent tables fall back to Default::default() per field group.
        let mut base = PlannerConfig::default();
        if let Ok(retrieval) = cfg.get::<RetrievalConfig>("retrieval") {
            base.retrieval = retrieval;
        }
        if let Ok(planner) = cfg.get::<PlannerTuning>("planner") {
            base.planner = planner;
        }
        if let Ok(travel_time) = cfg.get::<TravelTimeConfig>("travel_time") {
            base.travel_time = travel_time;
        }
        if let Ok(deadlines) = cfg.get::<DeadlineConfig>("deadlines") {
            base.deadlines = deadlines;
        }
        Ok(base)
    }
}
