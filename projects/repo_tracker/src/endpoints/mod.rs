pub mod error;
pub mod pull_requests;
pub mod repos;

use axum::{
	extract::Extension,
	routing::get,
	Router,
};
use tower_http::trace::TraceLayer;

use crate::services::{PullRequestService, RepositoryService};

/// Axum handler: GET /health
async fn health() -> &'static str {
	"ok"
}

pub fn router(repos: RepositoryService, pull_requests: PullRequestService) -> Router {
	Router::new()
		.route("/health", get(health))
		.route(
			"/repos",
			get(repos::list::index::handler).post(repos::add::index::handler),
		)
		// the id route reuses the `owner` segment name so both routes agree on
		// the parameter at that position; the handler reads it as a Uuid
		.route("/repos/{owner}/{name}", get(repos::get::index::handler))
		.route("/repos/{owner}", axum::routing::delete(repos::delete::index::handler))
		.route(
			"/pull_requests/{owner}/{name}",
			get(pull_requests::list::index::handler),
		)
		.layer(Extension(repos))
		.layer(Extension(pull_requests))
		.layer(TraceLayer::new_for_http())
}
