/*
 * src/sql_models/session.rs
 *
 * File for the conversation_sessions row model
 */

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub struct ConversationSessionRow {
    pub id: Uuid,
    pub state: String,
    pub slots: serde_json::Value,
    pub turn: i32,
    pub created_at: DateTime<Utc>,
}
