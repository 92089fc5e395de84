use chrono::{DateTime, Utc};
use interfaces_github_repos::{ApiLabel, ApiPullRequest};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub color: String,
}

/// Pull request as returned to callers. `id` is generated per response and is
/// not the upstream pull request number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub avatar_url: String,
    pub status: String,
    pub html_url: String,
    pub labels: Vec<Label>,
    pub draft: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestsResponse {
    pub pull_requests: Vec<PullRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("upstream pull request is missing `{field}`")]
    MissingField { field: &'static str },
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, MappingError> {
    value.ok_or(MappingError::MissingField { field })
}

impl TryFrom<ApiLabel> for Label {
    type Error = MappingError;

    fn try_from(label: ApiLabel) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required(label.name, "labels.name")?,
            color: label.color.unwrap_or_default(),
        })
    }
}

impl TryFrom<ApiPullRequest> for PullRequest {
    type Error = MappingError;

    fn try_from(pr: ApiPullRequest) -> Result<Self, Self::Error> {
        let user = required(pr.user, "user")?;
        let labels = pr
            .labels
            .into_iter()
            .map(Label::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: Uuid::new_v4(),
            title: required(pr.title, "title")?,
            author: required(user.login, "user.login")?,
            avatar_url: user.avatar_url.unwrap_or_default(),
            status: required(pr.state, "state")?,
            html_url: required(pr.html_url, "html_url")?,
            labels,
            draft: required(pr.draft, "draft")?,
            created_at: required(pr.created_at, "created_at")?,
        })
    }
}
