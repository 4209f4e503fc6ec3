/*
 * src/models/mod.rs
 *
 * Domain model layer: plain Rust types with no derive beyond Serialize/
 * Deserialize/Clone, one module per entity from the data model.
 */

pub mod candidate;
pub mod feedback;
pub mod itinerary;
pub mod place;
pub mod session;
pub mod story;
