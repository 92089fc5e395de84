use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Subset of `GET /repos/{owner}/{repo}` that the tracker cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiRepository {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub owner: Option<ApiUser>,
    pub html_url: Option<String>,
}

/// One item of `GET /repos/{owner}/{repo}/pulls`.
///
/// Fields are optional so a single malformed item can be skipped by the
/// caller instead of failing the whole page. A `null` label list reads as
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiPullRequest {
    pub number: Option<u64>,
    pub title: Option<String>,
    pub user: Option<ApiUser>,
    pub state: Option<String>,
    pub html_url: Option<String>,
    pub draft: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub labels: Vec<ApiLabel>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ApiLabel>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<ApiLabel>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiUser {
    pub login: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiLabel {
    pub name: Option<String>,
    pub color: Option<String>,
}
