/*
 * src/llm/extractor.rs
 *
 * File for the Story Extractor
 *
 * Purpose:
 *   Convert a free-text utterance into a typed Story, via an LLM
 *   constrained to a JSON schema, then validated and normalized.
 */

use async_trait::async_trait;
use chrono::NaiveDate;
use langchain_rust::language_models::llm::LLM;
use langchain_rust::llm::openai::{OpenAI, OpenAIModel};
use langchain_rust::schemas::Message;
use serde::Deserialize;

use crate::error::{AppError, PublicError};
use crate::models::place::Point;
use crate::models::story::{ConstraintTerm, DailyWindow, Pace, Story};

const SYSTEM_PROMPT: &str = r#"You convert a traveler's free-text trip description into strict JSON
matching this schema and nothing else:
{"destination": string, "anchor_lat": number, "anchor_lon": number,
 "start_date": "YYYY-MM-DD", "day_count": integer >= 1,
 "daily_start": "HH:MM", "daily_end": "HH:MM",
 "pace": "relaxed" | "moderate" | "intensive",
 "interests": [string], "must_have": [string], "must_not": [string],
 "budget": integer 1-5 or null}
Entries in must_have/must_not may be prefixed to say what they identify:
"id:<place id>" for a known catalog id, "name:<place name>" for a place
name, or a bare tag/category string (e.g. "museum") when neither applies.
Respond with the JSON object only, no commentary, no markdown fences."#;

#[derive(Debug, Deserialize)]
struct RawStory {
    destination: String,
    anchor_lat: f64,
    anchor_lon: f64,
    start_date: String,
    day_count: u32,
    daily_start: String,
    daily_end: String,
    pace: String,
    interests: Vec<String>,
    must_have: Vec<String>,
    must_not: Vec<String>,
    budget: Option<u8>,
}

#[async_trait]
pub trait StoryExtractor: Send + Sync {
    /// `max_day_count` bounds the extracted `day_count`, per the caller's
    /// configured `PlannerConfig::max_day_count`.
    async fn extract(&self, utterance: &str, max_day_count: u32) -> Result<Story, AppError>;
}

pub struct LlmStoryExtractor {
    llm: OpenAI<langchain_rust::llm::openai::OpenAIConfig>,
    synonyms: std::collections::HashMap<&'static str, &'static [&'static str]>,
}

impl LlmStoryExtractor {
    pub fn new() -> Self {
        let llm = OpenAI::default().with_model(OpenAIModel::Gpt4oMini.to_string());
        LlmStoryExtractor {
            llm,
            synonyms: default_synonyms(),
        }
    }

    fn normalize_interests(&self, interests: Vec<String>) -> Vec<String> {
        interests
            .into_iter()
            .map(|term| term.to_lowercase())
            .flat_map(|term| {
                self.synonyms
                    .get(term.as_str())
                    .map(|expanded| expanded.iter().map(|s| s.to_string()).collect::<Vec<_>>())
                    .unwrap_or_else(|| vec![term])
            })
            .collect()
    }
}

impl Default for LlmStoryExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn default_synonyms() -> std::collections::HashMap<&'static str, &'static [&'static str]> {
    let mut map = std::collections::HashMap::new();
    map.insert("food", &["restaurant", "cafe"] as &[&str]);
    map.insert("history", &["museum", "landmark"] as &[&str]);
    map.insert("nature", &["park", "garden"] as &[&str]);
    map.insert("nightlife", &["bar", "club"] as &[&str]);
    map.insert("shopping", &["market", "mall"] as &[&str]);
    map
}

fn parse_hhmm(s: &str) -> Option<u32> {
    let (h, m) = s.split_once(':')?;
    Some(h.parse::<u32>().ok()? * 60 + m.parse::<u32>().ok()?)
}

fn parse_constraint_term(raw: String) -> ConstraintTerm {
    if let Some(id) = raw.strip_prefix("id:") {
        ConstraintTerm::PlaceId(id.to_string())
    } else if let Some(name) = raw.strip_prefix("name:") {
        ConstraintTerm::Name(name.to_string())
    } else {
        ConstraintTerm::Tag(raw)
    }
}

fn parse_pace(s: &str) -> Pace {
    match s.to_lowercase().as_str() {
        "relaxed" => Pace::Relaxed,
        "intensive" => Pace::Intensive,
        _ => Pace::Moderate,
    }
}

fn strip_json_fence(raw: &str) -> &str {
    raw.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[async_trait]
impl StoryExtractor for LlmStoryExtractor {
    async fn extract(&self, utterance: &str, max_day_count: u32) -> Result<Story, AppError> {
        let messages = vec![
            Message::new_system_message(SYSTEM_PROMPT),
            Message::new_human_message(utterance),
        ];

        let raw_reply = self
            .llm
            .generate(&messages)
            .await
            .map_err(|e| AppError::from(PublicError::ParseError(e.to_string())))?
            .generation;

        let cleaned = strip_json_fence(&raw_reply);
        let raw: RawStory = serde_json::from_str(cleaned)
            .map_err(|e| AppError::from(PublicError::ParseError(e.to_string())))?;

        let start_date = NaiveDate::parse_from_str(&raw.start_date, "%Y-%m-%d")
            .map_err(|e| AppError::from(PublicError::ParseError(e.to_string())))?;
        let start_minute = parse_hhmm(&raw.daily_start)
            .ok_or_else(|| AppError::from(PublicError::ParseError("bad daily_start".into())))?;
        let end_minute = parse_hhmm(&raw.daily_end)
            .ok_or_else(|| AppError::from(PublicError::ParseError("bad daily_end".into())))?;

        let daily_window = DailyWindow {
            start_minute,
            end_minute,
        };
        if !daily_window.is_well_formed() {
            return Err(AppError::from(PublicError::ParseError(
                "daily window end must be after start".into(),
            )));
        }
        if raw.day_count == 0 || raw.day_count > max_day_count {
            return Err(AppError::from(PublicError::ParseError(
                "day_count out of range".into(),
            )));
        }

        Ok(Story {
            destination: raw.destination,
            anchor: Point {
                lat: raw.anchor_lat,
                lon: raw.anchor_lon,
            },
            start_date,
            day_count: raw.day_count,
            daily_window,
            pace: parse_pace(&raw.pace),
            interests: self.normalize_interests(raw.interests),
            must_have: raw
                .must_have
                .into_iter()
                .map(parse_constraint_term)
                .collect(),
            must_not: raw
                .must_not
                .into_iter()
                .map(parse_constraint_term)
                .collect(),
            budget_tier: raw.budget,
            accommodation: None,
        })
    }
}

/// Deterministic stand-in used when `DEPLOY_LLM` is unset, matching the
/// dummy response path this codebase falls back to elsewhere. Always
/// anchors on Lisbon and produces a 3-day moderate-pace trip, picking up
/// whichever known interest keywords appear in the utterance.
pub struct MockStoryExtractor;

#[async_trait]
impl StoryExtractor for MockStoryExtractor {
    async fn extract(&self, utterance: &str, max_day_count: u32) -> Result<Story, AppError> {
        if utterance.trim().is_empty() {
            return Err(AppError::from(PublicError::ParseError(
                "empty message".to_string(),
            )));
        }

        let lower = utterance.to_lowercase();
        let interests: Vec<String> = default_synonyms()
            .keys()
            .filter(|k| lower.contains(*k))
            .map(|k| k.to_string())
            .collect();

        Ok(Story {
            destination: "Lisbon".to_string(),
            anchor: Point {
                lat: 38.7223,
                lon: -9.1393,
            },
            start_date: chrono::Utc::now().date_naive(),
            day_count: 3.min(max_day_count.max(1)),
            daily_window: DailyWindow {
                start_minute: 9 * 60,
                end_minute: 21 * 60,
            },
            pace: Pace::Moderate,
            interests: if interests.is_empty() {
                vec!["food".to_string()]
            } else {
                interests
            },
            must_have: Vec::new(),
            must_not: Vec::new(),
            budget_tier: None,
            accommodation: None,
        })
    }
}
