/*
 * src/orchestrator/mod.rs
 *
 * File for the Conversation Orchestrator
 *
 * Purpose:
 *   The per-session state machine: each node reads a prefix of the slot
 *   map and writes a disjoint suffix. The orchestrator itself is
 *   single-threaded per session; fan-out lives inside the retrieve node.
 */

pub mod session_store;

use crate::error::{AppError, PublicError};
use crate::models::feedback::FeedbackOp;
use crate::models::session::{ConversationSession, ConversationState};
use crate::planner::PlanOutcome;
use crate::retrieval::{fuse, rerank, retrieve};
use crate::state::AppState;

pub struct TurnResult {
    pub reply: String,
    pub state: ConversationState,
    pub suggestions: Vec<String>,
}

/// Drives IDLE -> EXTRACT -> RETRIEVE -> RANK -> PLAN -> PRESENT -> READY.
pub async fn handle_message(
    state: &AppState,
    session: &mut ConversationSession,
    text: &str,
) -> Result<TurnResult, AppError> {
    session.slots.user_input = Some(text.to_string());
    session.state = ConversationState::Extract;

    let story = match state
        .extractor
        .extract(text, state.config.max_day_count)
        .await
    {
        Ok(story) => story,
        Err(AppError::Public(PublicError::ParseError(reason))) => {
            session.state = ConversationState::Idle;
            let reply = state.generator.clarify(&reason).await.unwrap_or(reason);
            return Ok(TurnResult {
                reply,
                state: session.state,
                suggestions: vec!["Try naming a destination and how many days.".to_string()],
            });
        }
        Err(e) => return Err(e),
    };
    session.slots.story = Some(story.clone());
    session.state = ConversationState::Retrieve;

    let outcome = retrieve(
        &story,
        &state.catalog,
        &state.vector_index,
        &state.embedder,
        &state.config,
    )
    .await;
    session.slots.structured_candidates = Some(outcome.structured.clone());
    session.slots.semantic_candidates = Some(outcome.semantic.clone());

    if outcome.structured.is_empty() && outcome.semantic.is_empty() {
        session.state = ConversationState::Idle;
        return Err(AppError::from(PublicError::NoCandidates));
    }

    session.state = ConversationState::Rank;
    let fused = fuse::fuse(outcome.structured, outcome.semantic);
    let weights = state.config.weights_for(story.pace);
    let ranked = rerank::rerank(fused, &story, &weights, state.config.retrieval.top_k);
    session.slots.candidates = Some(ranked.clone());

    session.state = ConversationState::Plan;
    let plan_outcome = crate::planner::plan(&story, &ranked, &state.catalog, &state.oracle, &state.config).await?;

    match plan_outcome {
        PlanOutcome::Feasible(itinerary) => {
            session.slots.itinerary = Some(itinerary.clone());
            session.state = ConversationState::Present;
            let reply = state
                .generator
                .present(&itinerary)
                .await
                .unwrap_or_else(|_| "Here is your itinerary.".to_string());
            session.state = ConversationState::Ready;
            Ok(TurnResult {
                reply,
                state: session.state,
                suggestions: vec![
                    "Ask me to drop or add a stop.".to_string(),
                    "Ask me to move something to another day.".to_string(),
                ],
            })
        }
        PlanOutcome::NeedsDecision { violations, partial } => {
            session.slots.itinerary = Some(partial);
            session.state = ConversationState::PlanPendingDecision;
            let reason = violations.join("; ");
            let reply = state
                .generator
                .clarify(&reason)
                .await
                .unwrap_or(reason.clone());
            Ok(TurnResult {
                reply,
                state: session.state,
                suggestions: violations,
            })
        }
    }
}

pub struct FeedbackResult {
    pub reply: String,
    pub applied: Vec<String>,
}

/// Drives READY -> FEEDBACK and back to READY (or PLAN_PENDING_DECISION
/// if the edit could not be made fully feasible).
pub async fn handle_feedback(
    state: &AppState,
    session: &mut ConversationSession,
    text: &str,
) -> Result<FeedbackResult, AppError> {
    let story = session
        .slots
        .story
        .clone()
        .ok_or_else(|| AppError::from(PublicError::BadRequest("no active trip".to_string())))?;
    let itinerary = session
        .slots
        .itinerary
        .clone()
        .ok_or_else(|| AppError::from(PublicError::BadRequest("no itinerary to edit".to_string())))?;
    let candidates: Vec<_> = session.slots.candidates.clone().unwrap_or_default();

    session.state = ConversationState::Feedback;
    let ops: Vec<FeedbackOp> = state.feedback_parser.parse(text).await?;

    let outcome = crate::feedback::apply_ops(
        &itinerary,
        &ops,
        &story,
        &candidates,
        &state.catalog,
        &state.oracle,
    )
    .await?;

    session.slots.itinerary = Some(outcome.itinerary.clone());

    if outcome.violations.is_empty() {
        session.state = ConversationState::Ready;
        let reply = state
            .generator
            .present(&outcome.itinerary)
            .await
            .unwrap_or_else(|_| "Updated your itinerary.".to_string());
        Ok(FeedbackResult {
            reply,
            applied: outcome.applied,
        })
    } else {
        session.state = ConversationState::PlanPendingDecision;
        let reason = outcome.violations.join("; ");
        let reply = state.generator.clarify(&reason).await.unwrap_or(reason);
        Ok(FeedbackResult {
            reply,
            applied: outcome.applied,
        })
    }
}

pub fn reset(session: &mut ConversationSession) {
    session.reset();
}
