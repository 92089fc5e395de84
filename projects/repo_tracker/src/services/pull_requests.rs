use std::sync::Arc;

use interfaces_github_repos::GithubApi;
use tracing::{debug, warn};

use crate::db::repository::store::RepositoryStore;
use crate::models::PullRequest;
use crate::services::error::ListPullRequestsError;

/// Lists upstream pull requests for repositories that are already tracked.
#[derive(Clone)]
pub struct PullRequestService {
    store: Arc<dyn RepositoryStore>,
    github: Arc<dyn GithubApi>,
}

impl PullRequestService {
    pub fn new(store: Arc<dyn RepositoryStore>, github: Arc<dyn GithubApi>) -> Self {
        Self { store, github }
    }

    /// Items that cannot be mapped are logged and left out; they never fail
    /// the request.
    pub async fn list(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Vec<PullRequest>, ListPullRequestsError> {
        if self.store.get_by_name_and_owner(name, owner).await?.is_none() {
            return Err(ListPullRequestsError::NotFound {
                owner: owner.to_owned(),
                name: name.to_owned(),
            });
        }

        let upstream = self.github.fetch_pull_requests(owner, name).await?;
        let fetched = upstream.len();

        let pull_requests: Vec<PullRequest> = upstream
            .into_iter()
            .filter_map(|pr| {
                let number = pr.number;
                PullRequest::try_from(pr)
                    .inspect_err(|error| {
                        warn!(owner, name, ?number, %error, "skipping unmappable pull request");
                    })
                    .ok()
            })
            .collect();

        debug!(owner, name, fetched, mapped = pull_requests.len(), "pull requests listed");
        Ok(pull_requests)
    }
}
