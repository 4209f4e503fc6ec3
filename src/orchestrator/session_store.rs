/*
 * src/orchestrator/session_store.rs
 *
 * File for conversation session persistence
 *
 * Purpose:
 *   Load/save a ConversationSession's slot map as a single jsonb row per
 *   turn, so cross-session isolation is enforced by construction: a turn
 *   touches exactly one row.
 */

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, PrivateError, PublicError};
use crate::models::session::ConversationSession;

pub async fn create(pool: &PgPool) -> Result<ConversationSession, AppError> {
    let session = ConversationSession::new();
    let slots = serde_json::to_value(&session.slots)
        .map_err(|e| AppError::from(PrivateError::Serialization(e)))?;

    sqlx::query(
        "INSERT INTO conversation_sessions (id, state, slots, turn, created_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(session.id)
    .bind("idle")
    .bind(slots)
    .bind(session.turn as i32)
    .bind(session.created_at)
    .execute(pool)
    .await
    .map_err(|e| AppError::from(PrivateError::Db(e)))?;

    Ok(session)
}

pub async fn load(pool: &PgPool, id: Uuid) -> Result<ConversationSession, AppError> {
    let row = sqlx::query_as::<_, crate::sql_models::session::ConversationSessionRow>(
        "SELECT id, state, slots, turn, created_at FROM conversation_sessions WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| AppError::from(PrivateError::Db(e)))?
    .ok_or_else(|| AppError::from(PublicError::NotFound("session not found".to_string())))?;

    let slots = serde_json::from_value(row.slots)
        .map_err(|e| AppError::from(PrivateError::Serialization(e)))?;
    let state = serde_json::from_value(serde_json::Value::String(row.state))
        .unwrap_or(crate::models::session::ConversationState::Idle);

    Ok(ConversationSession {
        id: row.id,
        state,
        slots,
        turn: row.turn.max(0) as u32,
        created_at: row.created_at,
    })
}

pub async fn save(pool: &PgPool, session: &ConversationSession) -> Result<(), AppError> {
    let slots = serde_json::to_value(&session.slots)
        .map_err(|e| AppError::from(PrivateError::Serialization(e)))?;
    let state = serde_json::to_value(session.state)
        .map_err(|e| AppError::from(PrivateError::Serialization(e)))?;
    let state_str = state.as_str().unwrap_or("idle").to_string();

    sqlx::query(
        "UPDATE conversation_sessions SET state = $2, slots = $3, turn = $4 WHERE id = $1",
    )
    .bind(session.id)
    .bind(state_str)
    .bind(slots)
    .bind(session.turn as i32)
    .execute(pool)
    .await
    .map_err(|e| AppError::from(PrivateError::Db(e)))?;

    Ok(())
}
