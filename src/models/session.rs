/*
 * src/models/session.rs
 *
 * File for the ConversationSession and its state machine
 *
 * Purpose:
 *   Per-session slot map the orchestrator reads a prefix of and writes a
 *   disjoint suffix of, one node at a time.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::candidate::Candidate;
use crate::models::itinerary::Itinerary;
use crate::models::story::Story;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    Idle,
    Extract,
    Retrieve,
    Rank,
    Plan,
    PlanPendingDecision,
    Present,
    Ready,
    Feedback,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotMap {
    pub user_input: Option<String>,
    pub story: Option<Story>,
    pub structured_candidates: Option<Vec<Candidate>>,
    pub semantic_candidates: Option<Vec<Candidate>>,
    pub candidates: Option<Vec<Candidate>>,
    pub itinerary: Option<Itinerary>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSession {
    pub id: Uuid,
    pub state: ConversationState,
    pub slots: SlotMap,
    pub turn: u32,
    pub created_at: DateTime<Utc>,
}

impl ConversationSession {
    pub fn new() -> Self {
        ConversationSession {
            id: Uuid::new_v4(),
            state: ConversationState::Idle,
            slots: SlotMap::default(),
            turn: 0,
            created_at: Utc::now(),
        }
    }

    pub fn reset(&mut self) {
        self.slots = SlotMap::default();
        self.state = ConversationState::Idle;
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}
