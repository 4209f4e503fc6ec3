#![allow(unexpected_cfgs)]

mod catalog;
mod config;
mod controllers;
mod db;
mod error;
mod feedback;
mod global;
mod http_models;
mod llm;
mod log;
mod middleware;
mod models;
mod orchestrator;
mod planner;
mod retrieval;
mod sql_models;
mod state;
mod travel_time;

#[cfg(not(tarpaulin_include))]
mod swagger;

use crate::controllers::AxumRouter;
use crate::global::*;
use axum::{Extension, routing::get_service};
use http::Method;
use std::env;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tower_http::{
	cors::{Any, CorsLayer},
	services::{ServeDir, ServeFile},
};

use crate::catalog::{PostgresCatalog, PostgresVectorIndex};
use crate::config::PlannerConfig;
use crate::feedback::{LlmFeedbackParser, MockFeedbackParser};
use crate::llm::embedder::{Embedder, MockEmbedder, OpenAiTextEmbedder};
use crate::llm::extractor::{LlmStoryExtractor, MockStoryExtractor, StoryExtractor};
use crate::llm::generator::{LlmReplyGenerator, MockReplyGenerator, ReplyGenerator};
use crate::state::AppState;
use crate::travel_time::backend::{GoogleMapsBackend, MockTravelTimeBackend, TravelTimeBackend};
use crate::travel_time::TravelTimeOracle;

/// Static assets fallback, served the same way this codebase serves its
/// bundled frontend; unused unless a `dist/` directory is deployed alongside
/// the binary.
const DIST_DIR: &str = "dist";

fn deploy_llm() -> bool {
	env::var("DEPLOY_LLM").map(|v| v == "1").unwrap_or(false)
}

#[cfg(not(tarpaulin_include))]
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
	// Load our evironment variables
	dotenvy::dotenv().ok();
	log::init_panic_handler();
	log::init_logger();

	let bind_address = env::var(BIND_ADDRESS).expect("BIND_ADDRESS must be set");

	// Initialize the database pool connection
	let pool = db::create_pool().await;

	let config = Arc::new(PlannerConfig::load().expect("failed to load configuration"));

	let catalog: Arc<dyn crate::catalog::CatalogRepository> =
		Arc::new(PostgresCatalog::new(pool.clone()));
	let vector_index: Arc<dyn crate::catalog::VectorIndex> =
		Arc::new(PostgresVectorIndex::new(pool.clone()));

	// The travel-time backend and every LLM-backed adapter are gated behind
	// DEPLOY_LLM / the presence of a Google Maps key, the same way this
	// codebase's chat handling falls back to a dummy response rather than
	// requiring a live API key for local development.
	let travel_backend: Arc<dyn TravelTimeBackend> = match GoogleMapsBackend::from_env() {
		Ok(backend) if deploy_llm() => Arc::new(backend),
		_ => Arc::new(MockTravelTimeBackend::default()),
	};
	let oracle = Arc::new(TravelTimeOracle::new(travel_backend, config.travel_time));

	let embedder: Arc<dyn Embedder> = if deploy_llm() {
		Arc::new(OpenAiTextEmbedder::new())
	} else {
		Arc::new(MockEmbedder::default())
	};
	let extractor: Arc<dyn StoryExtractor> = if deploy_llm() {
		Arc::new(LlmStoryExtractor::new())
	} else {
		Arc::new(MockStoryExtractor)
	};
	let generator: Arc<dyn ReplyGenerator> = if deploy_llm() {
		Arc::new(LlmReplyGenerator::new())
	} else {
		Arc::new(MockReplyGenerator)
	};
	let feedback_parser: Arc<dyn crate::feedback::FeedbackParser> = if deploy_llm() {
		Arc::new(LlmFeedbackParser::new())
	} else {
		Arc::new(MockFeedbackParser)
	};

	let state = Arc::new(AppState {
		pool: pool.clone(),
		catalog,
		vector_index,
		embedder,
		extractor,
		generator,
		feedback_parser,
		oracle,
		config: config.clone(),
	});

	/*
	/ Configure CORS
	/ This is a stateless JSON API with no cookies, so we allow any origin
	/ rather than maintaining an allow-list of frontend URLs.
	*/
	let cors = CorsLayer::new()
		.allow_origin(Any)
		.allow_methods([Method::GET, Method::POST, Method::DELETE])
		.allow_headers([http::header::CONTENT_TYPE, http::header::ACCEPT]);

	// API routes with CORS middleware
	let api_routes =
		AxumRouter::new().nest("/session", controllers::session::session_routes());

	let api_routes = AxumRouter::new().nest("/api", api_routes);

	#[cfg(all(not(test), debug_assertions))]
	let api_routes = crate::swagger::merge_swagger(api_routes);

	// Build the main router
	let app = axum::Router::new()
		.merge(api_routes)
		.layer(axum::middleware::from_fn_with_state(
			config.clone(),
			middleware::turn_deadline,
		))
		// Static files served from /dist, if deployed alongside the binary.
		.fallback_service(get_service(
			ServeDir::new(DIST_DIR)
				.fallback(ServeFile::new(Path::new(DIST_DIR).join("index.html"))),
		))
		.layer(Extension(state))
		.layer(cors);

	/*
	/ Bind the router to a specific port
	*/
	let addr = SocketAddr::from_str(&bind_address).expect("Invalid BIND_ADDRESS format");
	println!("Server starting on {}", bind_address);

	let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
	axum::serve(listener, app.into_make_service()).await?;

	Ok(())
}
