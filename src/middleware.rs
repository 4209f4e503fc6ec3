/*
 * src/middleware.rs
 *
 * File for request-scoped middleware
 *
 * Purpose:
 *   Apply the turn deadline to every session request and emit a tracing
 *   span carrying the session id, so a slow downstream call (LLM, travel
 *   time, DB) is visible in the logs it eventually times out from.
 */

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Duration;
use tracing::{Instrument, info_span};

use crate::config::PlannerConfig;
use crate::error::{AppError, PrivateError};

/// Wraps the request in the configured turn deadline and a tracing span.
/// On timeout, responds with the same body `AppError::Private(DeadlineExceeded)`
/// would produce, without running the handler to completion.
pub async fn turn_deadline(
    State(config): State<std::sync::Arc<PlannerConfig>>,
    req: Request,
    next: Next,
) -> Response {
    let span = info_span!("turn", path = %req.uri().path());
    let deadline = Duration::from_millis(config.deadlines.turn_deadline_ms);

    match tokio::time::timeout(deadline, next.run(req).instrument(span)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::error!("ERROR ->> turn deadline exceeded");
            AppError::from(PrivateError::DeadlineExceeded("turn".to_string())).into_response()
        }
    }
}
