/*
 * src/feedback/mod.rs
 *
 * File for the Feedback Engine
 */

pub mod apply;
pub mod dsl;

pub use apply::{apply_ops, ApplyOutcome};
pub use dsl::{FeedbackParser, LlmFeedbackParser, MockFeedbackParser};
