use axum::Router;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::controllers::session::SessionApiDoc;

#[derive(OpenApi)]
#[openapi(
    info(
    	title="Wayfinder API",
    	description = "The public API documentation for the Wayfinder conversational trip-planning service."
    ),
    nest(
    	(path="/api/session", api=SessionApiDoc),
    ),
    servers(
    	(url="http://localhost:3001", description="Local host server for development"),
    )
)]
#[allow(dead_code)]
struct ApiDoc;

/// Merges swagger with the current routes
#[allow(dead_code)]
pub fn merge_swagger(router: OpenApiRouter) -> Router {
	let doc = ApiDoc::openapi();
	let docs_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("docs");
	fs::create_dir_all(&docs_path).unwrap();
	let mut file = File::create(docs_path.join("openapi.json")).unwrap();
	file.write_all(doc.to_pretty_json().unwrap().as_bytes())
		.unwrap();
	let (router, api) = OpenApiRouter::with_openapi(doc)
		.merge(router)
		.split_for_parts();
	router.merge(SwaggerUi::new("/swagger").url("/docs/openapi.json", api.clone()))
}
