//! GitHub REST client for repository lookups and pull request listing
//!
//! - `GithubApi` is the capability trait consumed by services
//! - `GithubClient` implements it over a pooled reqwest client
//! - payload types in `types` keep every mapped field optional

pub mod index;
pub mod types;

pub use index::{
    BuildGithubClientError, FetchPullRequestsError, FetchRepositoryError, GithubApi, GithubClient,
    DEFAULT_API_URL,
};
pub use types::{ApiLabel, ApiPullRequest, ApiRepository, ApiUser};

#[cfg(any(test, feature = "test-support"))]
pub use index::MockGithubApi;
