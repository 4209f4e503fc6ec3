/*
 * src/models/feedback.rs
 *
 * File for the feedback DSL and its append-only event log entries.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "UPPERCASE")]
pub enum FeedbackOp {
    Drop {
        place_id: String,
    },
    Replace {
        place_id: String,
        hint_tags: Vec<String>,
    },
    Move {
        place_id: String,
        target_day: u32,
        /// Minutes-from-midnight the caller wants this visit to start at,
        /// checked directly against the target place's opening hours.
        new_time_minute: Option<u32>,
    },
    Insert {
        description: String,
        preferred_day: Option<u32>,
    },
    Swap {
        place_id_a: String,
        place_id_b: String,
    },
    Reorder {
        day_index: u32,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub session_id: uuid::Uuid,
    pub op: FeedbackOp,
    pub reason: String,
    pub applied_at: DateTime<Utc>,
}
