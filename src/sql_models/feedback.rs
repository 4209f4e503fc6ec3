/*
 * src/sql_models/feedback.rs
 *
 * File for the append-only feedback_events row model
 */

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::sql_models::FeedbackOpKind;

#[derive(Debug, FromRow)]
pub struct FeedbackEventRow {
    pub id: i64,
    pub session_id: Uuid,
    pub op_kind: FeedbackOpKind,
    pub op_payload: serde_json::Value,
    pub reason: String,
    pub applied_at: DateTime<Utc>,
}
