/*
 * src/error.rs
 *
 * File for the application error taxonomy
 *
 * Purpose:
 *   Define the single error type returned from axum handlers, split into a
 *   public half (safe to describe to the caller) and a private half (logged
 *   in full, never echoed back).
 */

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, AppError>;

/// Errors safe to describe to the client.
#[derive(Debug, Error)]
pub enum PublicError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("could not understand request: {0}")]
    ParseError(String),
    #[error("no matching places found")]
    NoCandidates,
    #[error("itinerary infeasible: {0}")]
    Infeasible(String),
    #[error("unauthorized")]
    Unauthorized,
}

/// Errors that must never be echoed back to the client verbatim.
#[derive(Debug, Error)]
pub enum PrivateError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("travel-time backend unavailable: {0}")]
    TravelTimeBackend(String),
    #[error("language model backend unavailable: {0}")]
    LlmBackend(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("deadline exceeded for stage: {0}")]
    DeadlineExceeded(String),
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    #[error("configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Public(#[from] PublicError),
    #[error(transparent)]
    Private(#[from] PrivateError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Public(public) => {
                let status = match &public {
                    PublicError::Validation(_)
                    | PublicError::BadRequest(_)
                    | PublicError::ParseError(_)
                    | PublicError::NoCandidates
                    | PublicError::Infeasible(_) => StatusCode::BAD_REQUEST,
                    PublicError::NotFound(_) => StatusCode::NOT_FOUND,
                    PublicError::Conflict(_) => StatusCode::CONFLICT,
                    PublicError::Unauthorized => StatusCode::UNAUTHORIZED,
                };
                (
                    status,
                    Json(ErrorBody {
                        error: public.to_string(),
                    }),
                )
                    .into_response()
            }
            AppError::Private(private) => {
                tracing::error!("ERROR ->> private error: {private:?}");
                let status = match &private {
                    PrivateError::TravelTimeBackend(_) | PrivateError::LlmBackend(_) => {
                        StatusCode::SERVICE_UNAVAILABLE
                    }
                    PrivateError::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (
                    status,
                    Json(ErrorBody {
                        error: "internal error".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
