//! Async facade over the repository queries.
//!
//! Diesel connections are blocking, so every statement runs on tokio's
//! blocking pool and is awaited under the configured query timeout.

use std::time::Duration;

use async_trait::async_trait;
use diesel::PgConnection;
use thiserror::Error;
use uuid::Uuid;

use crate::db::repository::models::{NewRepository, Repository};
use crate::db::repository::queries::{
    delete_repository, get_repository_by_id, get_repository_by_name, insert_repository,
    list_repositories, DeleteRepositoryError, GetRepositoryByIdError, GetRepositoryByNameError,
    InsertRepositoryError, ListRepositoriesError,
};
use crate::db::PgPool;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("GetConnectionFromPool: {source}")]
    GetConnectionFromPool {
        #[from]
        source: r2d2::Error,
    },
    #[error("repository {owner}/{name} already exists")]
    AlreadyExists { owner: String, name: String },
    #[error(transparent)]
    ListRepositories {
        #[from]
        source: ListRepositoriesError,
    },
    #[error(transparent)]
    InsertRepository { source: InsertRepositoryError },
    #[error(transparent)]
    GetRepositoryByName {
        #[from]
        source: GetRepositoryByNameError,
    },
    #[error(transparent)]
    GetRepositoryById {
        #[from]
        source: GetRepositoryByIdError,
    },
    #[error(transparent)]
    DeleteRepository {
        #[from]
        source: DeleteRepositoryError,
    },
    #[error("BlockingTask: {source}")]
    BlockingTask {
        #[from]
        source: tokio::task::JoinError,
    },
    #[error("query cancelled after {after:?}")]
    Cancelled { after: Duration },
}

impl From<InsertRepositoryError> for StoreError {
    fn from(source: InsertRepositoryError) -> Self {
        match source {
            InsertRepositoryError::AlreadyExists { owner, name } => {
                StoreError::AlreadyExists { owner, name }
            }
            source => StoreError::InsertRepository { source },
        }
    }
}

/// Persistence for tracked repositories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Repository>, StoreError>;

    /// Inserts a row with a fresh id. A duplicate `(name, owner)` fails with
    /// `StoreError::AlreadyExists`.
    async fn add(&self, owner: &str, name: &str) -> Result<Repository, StoreError>;

    async fn get_by_name_and_owner(
        &self,
        name: &str,
        owner: &str,
    ) -> Result<Option<Repository>, StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Repository>, StoreError>;

    /// Removes the row and returns it; `None` when no row had that id.
    async fn delete(&self, id: Uuid) -> Result<Option<Repository>, StoreError>;
}

/// `RepositoryStore` backed by the PostgreSQL pool.
#[derive(Clone)]
pub struct PgRepositoryStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgRepositoryStore {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self { pool, query_timeout }
    }

    async fn run<T, E, F>(&self, query: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<StoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        let task = tokio::task::spawn_blocking(move || -> Result<T, StoreError> {
            let mut conn = pool.get()?;
            query(&mut *conn).map_err(Into::into)
        });

        match tokio::time::timeout(self.query_timeout, task).await {
            Ok(joined) => joined?,
            Err(_) => Err(StoreError::Cancelled {
                after: self.query_timeout,
            }),
        }
    }
}

#[async_trait]
impl RepositoryStore for PgRepositoryStore {
    async fn list(&self) -> Result<Vec<Repository>, StoreError> {
        self.run(list_repositories).await
    }

    async fn add(&self, owner: &str, name: &str) -> Result<Repository, StoreError> {
        let id = Uuid::new_v4();
        let owner = owner.to_owned();
        let name = name.to_owned();
        self.run(move |conn| {
            insert_repository(
                conn,
                &NewRepository {
                    id,
                    name: &name,
                    owner: &owner,
                },
            )
        })
        .await
    }

    async fn get_by_name_and_owner(
        &self,
        name: &str,
        owner: &str,
    ) -> Result<Option<Repository>, StoreError> {
        let owner = owner.to_owned();
        let name = name.to_owned();
        self.run(move |conn| get_repository_by_name(conn, &owner, &name))
            .await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Repository>, StoreError> {
        self.run(move |conn| get_repository_by_id(conn, id)).await
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Repository>, StoreError> {
        self.run(move |conn| delete_repository(conn, id)).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use diesel::r2d2::{ConnectionManager, Pool};

    use super::*;

    #[tokio::test]
    async fn slow_query_is_cancelled_after_timeout() {
        // nothing listens on port 1, so checkout blocks until connection_timeout
        let pool = Pool::builder()
            .max_size(1)
            .connection_timeout(Duration::from_secs(1))
            .build_unchecked(ConnectionManager::<PgConnection>::new(
                "postgres://127.0.0.1:1/none",
            ));
        let store = PgRepositoryStore::new(pool, Duration::from_millis(50));

        let started = Instant::now();
        let result = store.list().await;

        assert!(
            matches!(result, Err(StoreError::Cancelled { after }) if after == Duration::from_millis(50)),
            "expected Cancelled, got {result:?}"
        );
        assert!(started.elapsed() < Duration::from_millis(900));
    }
}
