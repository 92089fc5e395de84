pub mod pull_request;
pub mod repository;

pub use pull_request::{Label, MappingError, PullRequest, PullRequestsResponse};
pub use repository::{AddRepoParams, Repo, ReposResponse};
