/*
 * src/controllers/session.rs
 *
 * File for Session Controller API Endpoints
 *
 * Purpose:
 *   Serve Conversation Session API Requests
 *
 * Include:
 *   api_create_session  - POST /api/session                   -> starts a new conversation
 *   api_post_message     - POST /api/session/{id}/message       -> drives the orchestrator one turn
 *   api_get_state         - GET  /api/session/{id}/state         -> current state + itinerary snapshot
 *   api_post_feedback     - POST /api/session/{id}/feedback      -> applies a revision to the itinerary
 *   api_post_reset        - POST /api/session/{id}/reset         -> clears slots back to idle
 */

use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::{Json, Router, routing::{get, post}};
use serde_json::json;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::{ApiResult, AppError, PublicError};
use crate::http_models::itinerary::ItineraryDto;
use crate::http_models::session::{
    CreateSessionResponse, FeedbackRequest, FeedbackResponse, MessageRequest, MessageResponse,
    SessionStateResponse,
};
use crate::models::session::ConversationState;
use crate::orchestrator::{self, session_store};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        api_create_session,
        api_post_message,
        api_get_state,
        api_post_feedback,
        api_post_reset
    ),
    info(
        title = "Session Routes",
        description = "API endpoints for driving the conversational trip-planning session."
    ),
    tags((name = "Session"))
)]
pub struct SessionApiDoc;

/// Start a new conversation session.
///
/// # Method
/// `POST /api/session`
///
/// # Responses
/// - `200 OK` - `{ "session_id": uuid }`
/// - `500 INTERNAL_SERVER_ERROR` - Internal error (private)
///
/// # Examples
/// ```bash
/// curl -X POST http://localhost:3001/api/session
/// ```
#[utoipa::path(
    post,
    path = "",
    summary = "Start a new conversation session",
    responses(
        (status = 200, description = "Session created", body = CreateSessionResponse,
            example = json!({"session_id": "8c2e9b0a-4c1a-4e9e-9b7b-2f6a2b7b9c11"})),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Session"
)]
pub async fn api_create_session(
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<Json<CreateSessionResponse>> {
    let session = session_store::create(&state.pool).await?;
    Ok(Json(CreateSessionResponse { session_id: session.id }))
}

/// Send a free-text message to drive the conversation one turn forward.
///
/// # Method
/// `POST /api/session/{id}/message`
///
/// # Request Body
/// - `text`: The traveler's message (string, required).
///
/// # Responses
/// - `200 OK` - `{ "reply": string, "state": string, "itinerary": ItineraryDto|null, "suggestions": [string] }`
/// - `400 BAD_REQUEST` - Could not parse a trip story, no candidates matched, or the plan is
///   infeasible and needs the traveler's decision (public error)
/// - `404 NOT_FOUND` - Unknown session id
/// - `504 GATEWAY_TIMEOUT` - Turn deadline exceeded
///
/// # Examples
/// ```bash
/// curl -X POST http://localhost:3001/api/session/<id>/message \
///   -H "Content-Type: application/json" \
///   -d '{"text": "3 days in Lisbon, love food markets and viewpoints"}'
/// ```
#[utoipa::path(
    post,
    path = "/{id}/message",
    summary = "Send a message to drive the conversation forward",
    request_body(content = MessageRequest, content_type = "application/json"),
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Turn processed", body = MessageResponse),
        (status = 400, description = "Could not parse trip story or no candidates matched"),
        (status = 404, description = "Unknown session id"),
        (status = 504, description = "Turn deadline exceeded")
    ),
    tag = "Session"
)]
pub async fn api_post_message(
    Path(session_id): Path<Uuid>,
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<MessageRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let mut session = session_store::load(&state.pool, session_id).await?;

    let result = orchestrator::handle_message(&state, &mut session, &payload.text).await?;

    session.turn += 1;
    session_store::save(&state.pool, &session).await?;

    if result.state == ConversationState::PlanPendingDecision {
        return Err(AppError::from(PublicError::Infeasible(
            result.suggestions.join("; "),
        )));
    }

    Ok(Json(MessageResponse {
        reply: result.reply,
        state: format!("{:?}", result.state).to_lowercase(),
        itinerary: session.slots.itinerary.as_ref().map(ItineraryDto::from),
        suggestions: result.suggestions,
    }))
}

/// Return the current state and itinerary snapshot for a session.
///
/// # Method
/// `GET /api/session/{id}/state`
///
/// # Responses
/// - `200 OK` - `{ "session_id": uuid, "state": string, "turn": u32, "itinerary": ItineraryDto|null }`
/// - `404 NOT_FOUND` - Unknown session id
#[utoipa::path(
    get,
    path = "/{id}/state",
    summary = "Fetch the current state and itinerary snapshot",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session state", body = SessionStateResponse),
        (status = 404, description = "Unknown session id")
    ),
    tag = "Session"
)]
pub async fn api_get_state(
    Path(session_id): Path<Uuid>,
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<Json<SessionStateResponse>> {
    let session = session_store::load(&state.pool, session_id).await?;
    Ok(Json(SessionStateResponse {
        session_id: session.id,
        state: format!("{:?}", session.state).to_lowercase(),
        turn: session.turn,
        itinerary: session.slots.itinerary.as_ref().map(ItineraryDto::from),
    }))
}

/// Apply a revision request to the current itinerary.
///
/// # Method
/// `POST /api/session/{id}/feedback`
///
/// # Request Body
/// - `text`: The traveler's revision request (string, required).
///
/// # Responses
/// - `200 OK` - `{ "reply": string, "itinerary": ItineraryDto, "applied_ops": [string] }`
/// - `400 BAD_REQUEST` - No active trip or itinerary to edit (public error)
/// - `404 NOT_FOUND` - Unknown session id
///
/// # Examples
/// ```bash
/// curl -X POST http://localhost:3001/api/session/<id>/feedback \
///   -H "Content-Type: application/json" \
///   -d '{"text": "drop the aquarium and put something food-related there instead"}'
/// ```
#[utoipa::path(
    post,
    path = "/{id}/feedback",
    summary = "Apply a revision request to the current itinerary",
    request_body(content = FeedbackRequest, content_type = "application/json"),
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Revision applied", body = FeedbackResponse),
        (status = 400, description = "No active trip or itinerary to edit"),
        (status = 404, description = "Unknown session id")
    ),
    tag = "Session"
)]
pub async fn api_post_feedback(
    Path(session_id): Path<Uuid>,
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<FeedbackRequest>,
) -> ApiResult<Json<FeedbackResponse>> {
    let mut session = session_store::load(&state.pool, session_id).await?;

    let result = orchestrator::handle_feedback(&state, &mut session, &payload.text).await?;

    let itinerary = session
        .slots
        .itinerary
        .as_ref()
        .ok_or_else(|| AppError::from(PublicError::BadRequest("no itinerary on session".to_string())))?;
    let itinerary_dto = ItineraryDto::from(itinerary);

    session.turn += 1;
    session_store::save(&state.pool, &session).await?;

    Ok(Json(FeedbackResponse {
        reply: result.reply,
        itinerary: itinerary_dto,
        applied_ops: result.applied,
    }))
}

/// Reset a session's slots back to idle, keeping the session id.
///
/// # Method
/// `POST /api/session/{id}/reset`
///
/// # Responses
/// - `200 OK` - `{ "session_id": uuid, "state": "idle", "turn": u32, "itinerary": null }`
/// - `404 NOT_FOUND` - Unknown session id
#[utoipa::path(
    post,
    path = "/{id}/reset",
    summary = "Reset a session's slots back to idle",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session reset", body = SessionStateResponse),
        (status = 404, description = "Unknown session id")
    ),
    tag = "Session"
)]
pub async fn api_post_reset(
    Path(session_id): Path<Uuid>,
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<Json<SessionStateResponse>> {
    let mut session = session_store::load(&state.pool, session_id).await?;
    orchestrator::reset(&mut session);
    session_store::save(&state.pool, &session).await?;
    Ok(Json(SessionStateResponse {
        session_id: session.id,
        state: format!("{:?}", session.state).to_lowercase(),
        turn: session.turn,
        itinerary: None,
    }))
}

pub fn session_routes() -> Router {
    Router::new()
        .route("/", post(api_create_session))
        .route("/{id}/message", post(api_post_message))
        .route("/{id}/state", get(api_get_state))
        .route("/{id}/feedback", post(api_post_feedback))
        .route("/{id}/reset", post(api_post_reset))
}
