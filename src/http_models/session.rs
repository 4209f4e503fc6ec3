/*
 * src/http_models/session.rs
 *
 * File for Session API request/response DTOs
 */

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::http_models::itinerary::ItineraryDto;

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub reply: String,
    /// Current conversation state, e.g. "ready" or "plan_pending_decision".
    pub state: String,
    pub itinerary: Option<ItineraryDto>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionStateResponse {
    pub session_id: Uuid,
    pub state: String,
    pub turn: u32,
    pub itinerary: Option<ItineraryDto>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FeedbackRequest {
    pub text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedbackResponse {
    pub reply: String,
    pub itinerary: ItineraryDto,
    pub applied_ops: Vec<String>,
}
