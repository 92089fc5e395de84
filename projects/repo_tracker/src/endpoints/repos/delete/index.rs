use axum::{
	extract::{Extension, Path},
	http::StatusCode,
};
use uuid::Uuid;

use crate::services::{error::DeleteRepoError, RepositoryService};

/// Axum handler: DELETE /repos/{id}
///
/// Answers with an empty body; a malformed id is rejected by the `Path`
/// extractor with 400.
pub async fn handler(
	Extension(service): Extension<RepositoryService>,
	Path(id): Path<Uuid>,
) -> Result<StatusCode, DeleteRepoError> {
	service.delete(id).await?;
	Ok(StatusCode::OK)
}
