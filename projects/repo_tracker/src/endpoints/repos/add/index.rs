use axum::extract::{Extension, Json};

use crate::models::{AddRepoParams, Repo};
use crate::services::{error::AddRepoError, RepositoryService};

/// Axum handler: POST /repos
pub async fn handler(
	Extension(service): Extension<RepositoryService>,
	Json(input): Json<AddRepoParams>,
) -> Result<Json<Repo>, AddRepoError> {
	service.add(&input.owner, &input.name).await.map(Json)
}
