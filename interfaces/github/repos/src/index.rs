use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode, Url};
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::{ApiPullRequest, ApiRepository};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = "repo-tracker";
const API_VERSION: &str = "2022-11-28";

/// Read-only view of the GitHub REST API used by the tracker.
#[cfg_attr(any(test, feature = "test-support"), mockall::automock)]
#[async_trait]
pub trait GithubApi: Send + Sync {
    /// `GET /repos/{owner}/{name}`. A 404 is reported as `NotFound`.
    async fn fetch_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<ApiRepository, FetchRepositoryError>;

    /// `GET /repos/{owner}/{name}/pulls`, first page only.
    async fn fetch_pull_requests(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Vec<ApiPullRequest>, FetchPullRequestsError>;
}

#[derive(Debug, Error)]
pub enum BuildGithubClientError {
    #[error("InvalidBaseUrl: {url}")]
    InvalidBaseUrl { url: String },

    #[error("InvalidToken: token contains characters not allowed in a header")]
    InvalidToken {
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },

    #[error("BuildClient: {source}")]
    BuildClient {
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
pub enum FetchRepositoryError {
    #[error("repository {owner}/{name} not found upstream")]
    NotFound { owner: String, name: String },

    #[error("UnexpectedStatus: {status}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("RequestSend: {source}")]
    RequestSend {
        #[source]
        source: reqwest::Error,
    },

    #[error("ResponseDecode: {source}")]
    ResponseDecode {
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
pub enum FetchPullRequestsError {
    #[error("UnexpectedStatus: {status}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("RequestSend: {source}")]
    RequestSend {
        #[source]
        source: reqwest::Error,
    },

    #[error("ResponseDecode: {source}")]
    ResponseDecode {
        #[source]
        source: reqwest::Error,
    },
}

/// reqwest-backed `GithubApi`. Cheap to clone; the connection pool is shared.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    base_url: Url,
}

impl GithubClient {
    /// Builds a client against `base_url`. An empty `token` sends
    /// unauthenticated requests.
    pub fn new(base_url: &str, token: &str) -> Result<Self, BuildGithubClientError> {
        let base_url = Url::parse(base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| BuildGithubClientError::InvalidBaseUrl {
                url: base_url.to_owned(),
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        if !token.is_empty() {
            let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|source| BuildGithubClientError::InvalidToken { source })?;
            auth.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth);
        }

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|source| BuildGithubClientError::BuildClient { source })?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // base_url is checked to be a base in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get(&self, segments: &[&str]) -> Result<Response, reqwest::Error> {
        let url = self.endpoint(segments);
        debug!(%url, "GET upstream");
        self.http.get(url).send().await
    }
}

/// Body of a failed response, for the error. A body that cannot be read is
/// reported as empty.
async fn error_body(response: Response) -> String {
    match response.text().await {
        Ok(body) => body,
        Err(err) => {
            debug!(error = %err, "failed to read upstream error body");
            String::new()
        }
    }
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn fetch_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<ApiRepository, FetchRepositoryError> {
        let response = self
            .get(&["repos", owner, name])
            .await
            .map_err(|source| FetchRepositoryError::RequestSend { source })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchRepositoryError::NotFound {
                owner: owner.to_owned(),
                name: name.to_owned(),
            });
        }
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(FetchRepositoryError::UnexpectedStatus { status, body });
        }

        response
            .json::<ApiRepository>()
            .await
            .map_err(|source| FetchRepositoryError::ResponseDecode { source })
    }

    async fn fetch_pull_requests(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Vec<ApiPullRequest>, FetchPullRequestsError> {
        let response = self
            .get(&["repos", owner, name, "pulls"])
            .await
            .map_err(|source| FetchPullRequestsError::RequestSend { source })?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(FetchPullRequestsError::UnexpectedStatus { status, body });
        }

        // items are decoded one by one so a malformed item only drops itself
        let items = response
            .json::<Vec<serde_json::Value>>()
            .await
            .map_err(|source| FetchPullRequestsError::ResponseDecode { source })?;

        Ok(items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| {
                serde_json::from_value::<ApiPullRequest>(item)
                    .inspect_err(|err| {
                        warn!(owner, name, index, error = %err, "skipping undecodable pull request");
                    })
                    .ok()
            })
            .collect())
    }
}
