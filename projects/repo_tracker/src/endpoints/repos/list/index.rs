use axum::extract::{Extension, Json};

use crate::models::ReposResponse;
use crate::services::{error::ListReposError, RepositoryService};

/// Axum handler: GET /repos
pub async fn handler(
	Extension(service): Extension<RepositoryService>,
) -> Result<Json<ReposResponse>, ListReposError> {
	let repos = service.list().await?;
	Ok(Json(ReposResponse { repos }))
}
