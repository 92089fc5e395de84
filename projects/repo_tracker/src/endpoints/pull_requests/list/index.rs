use axum::extract::{Extension, Json, Path};

use crate::models::PullRequestsResponse;
use crate::services::{error::ListPullRequestsError, PullRequestService};

/// Axum handler: GET /pull_requests/{owner}/{name}
pub async fn handler(
	Extension(service): Extension<PullRequestService>,
	Path((owner, name)): Path<(String, String)>,
) -> Result<Json<PullRequestsResponse>, ListPullRequestsError> {
	let pull_requests = service.list(&owner, &name).await?;
	Ok(Json(PullRequestsResponse { pull_requests }))
}
