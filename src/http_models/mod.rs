/*
 * src/http_models/mod.rs
 *
 * Wire DTOs for the Session API, documented with utoipa for the generated
 * OpenAPI schema.
 */

pub mod itinerary;
pub mod session;
pub mod story;
