use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repository::models::Repository;

/// Body of `POST /repos`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddRepoParams {
    pub name: String,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub id: Uuid,
    pub name: String,
    pub owner: String,
}

impl From<Repository> for Repo {
    fn from(entity: Repository) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            owner: entity.owner,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReposResponse {
    pub repos: Vec<Repo>,
}
