use axum::extract::{Extension, Json, Path};

use crate::models::Repo;
use crate::services::{error::GetRepoError, RepositoryService};

/// Axum handler: GET /repos/{owner}/{name}
pub async fn handler(
	Extension(service): Extension<RepositoryService>,
	Path((owner, name)): Path<(String, String)>,
) -> Result<Json<Repo>, GetRepoError> {
	service.get(&owner, &name).await.map(Json)
}
