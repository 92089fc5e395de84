use std::error::Error;

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
};
use tracing::error;

use crate::services::error::{
	AddRepoError, Classify, DeleteRepoError, ErrorKind, GetRepoError, ListPullRequestsError,
	ListReposError,
};

pub const INTERNAL_ERROR_BODY: &str = "internal server error";

/// Renders `err` and its sources as `outer: inner: root`.
fn chain(err: &dyn Error) -> String {
	let mut rendered = err.to_string();
	let mut source = err.source();
	while let Some(cause) = source {
		rendered.push_str(": ");
		rendered.push_str(&cause.to_string());
		source = cause.source();
	}
	rendered
}

/// Client-facing failures carry the error message; internal ones are logged
/// and answered with a fixed body.
fn error_response<E: Classify + Error>(err: &E) -> Response {
	let status = match err.kind() {
		ErrorKind::NotFound => StatusCode::NOT_FOUND,
		ErrorKind::AlreadyExists => StatusCode::CONFLICT,
		ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
		ErrorKind::Internal => {
			error!(error = %chain(err), "request failed");
			return (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response();
		}
	};
	(status, err.to_string()).into_response()
}

macro_rules! impl_into_response {
	($($error:ty),+ $(,)?) => {
		$(
			impl IntoResponse for $error {
				fn into_response(self) -> Response {
					error_response(&self)
				}
			}
		)+
	};
}

impl_into_response!(
	ListReposError,
	GetRepoError,
	AddRepoError,
	DeleteRepoError,
	ListPullRequestsError,
);
