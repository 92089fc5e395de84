use interfaces_github_repos::{FetchPullRequestsError, FetchRepositoryError};
use thiserror::Error;
use uuid::Uuid;

use crate::db::repository::store::StoreError;

/// Coarse classification the HTTP layer turns into a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    InvalidInput,
    Internal,
}

pub trait Classify {
    fn kind(&self) -> ErrorKind;
}

#[derive(Debug, Error)]
pub enum ListReposError {
    #[error("ListRepositories: {source}")]
    Store {
        #[from]
        source: StoreError,
    },
}

impl Classify for ListReposError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Internal
    }
}

#[derive(Debug, Error)]
pub enum GetRepoError {
    #[error("repository {owner}/{name} is not tracked")]
    NotFound { owner: String, name: String },
    #[error("GetRepository: {source}")]
    Store {
        #[from]
        source: StoreError,
    },
}

impl Classify for GetRepoError {
    fn kind(&self) -> ErrorKind {
        match self {
            GetRepoError::NotFound { .. } => ErrorKind::NotFound,
            GetRepoError::Store { .. } => ErrorKind::Internal,
        }
    }
}

#[derive(Debug, Error)]
pub enum AddRepoError {
    #[error("{field} must not be empty")]
    InvalidInput { field: &'static str },
    #[error("repository {owner}/{name} is already tracked")]
    AlreadyExists { owner: String, name: String },
    #[error("repository {owner}/{name} not found upstream")]
    NotFoundUpstream { owner: String, name: String },
    #[error("LookupExisting: {source}")]
    Lookup { source: StoreError },
    #[error("FetchRepository: {source}")]
    Upstream { source: FetchRepositoryError },
    #[error("InsertRepository: {source}")]
    Insert { source: StoreError },
}

impl Classify for AddRepoError {
    fn kind(&self) -> ErrorKind {
        match self {
            AddRepoError::InvalidInput { .. } => ErrorKind::InvalidInput,
            AddRepoError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            AddRepoError::NotFoundUpstream { .. } => ErrorKind::NotFound,
            AddRepoError::Lookup { .. }
            | AddRepoError::Upstream { .. }
            | AddRepoError::Insert { .. } => ErrorKind::Internal,
        }
    }
}

#[derive(Debug, Error)]
pub enum DeleteRepoError {
    #[error("repository {id} is not tracked")]
    NotFound { id: Uuid },
    #[error("DeleteRepository: {source}")]
    Store {
        #[from]
        source: StoreError,
    },
}

impl Classify for DeleteRepoError {
    fn kind(&self) -> ErrorKind {
        match self {
            DeleteRepoError::NotFound { .. } => ErrorKind::NotFound,
            DeleteRepoError::Store { .. } => ErrorKind::Internal,
        }
    }
}

#[derive(Debug, Error)]
pub enum ListPullRequestsError {
    #[error("repository {owner}/{name} is not tracked")]
    NotFound { owner: String, name: String },
    #[error("LookupRepository: {source}")]
    Lookup {
        #[from]
        source: StoreError,
    },
    #[error("FetchPullRequests: {source}")]
    Upstream {
        #[from]
        source: FetchPullRequestsError,
    },
}

impl Classify for ListPullRequestsError {
    fn kind(&self) -> ErrorKind {
        match self {
            ListPullRequestsError::NotFound { .. } => ErrorKind::NotFound,
            ListPullRequestsError::Lookup { .. } | ListPullRequestsError::Upstream { .. } => {
                ErrorKind::Internal
            }
        }
    }
}
