pub const LOG_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/logs");
pub const CRASH_LOG: &str = "crash.log";
pub const LATEST_LOG: &str = "latest.log";

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const GOOGLE_MAPS_API_KEY: &str = "GOOGLE_MAPS_API_KEY";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const BIND_ADDRESS: &str = "BIND_ADDRESS";

/// Maximum number of feedback-driven itinerary versions retained per session.
pub const MAX_ITINERARY_HISTORY: usize = 20;
