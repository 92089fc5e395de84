use std::sync::Arc;

use interfaces_github_repos::{FetchRepositoryError, GithubApi};
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::repository::store::{RepositoryStore, StoreError};
use crate::models::Repo;
use crate::services::error::{AddRepoError, DeleteRepoError, GetRepoError, ListReposError};

/// Lifecycle of tracked repositories: list, get, add, delete.
#[derive(Clone)]
pub struct RepositoryService {
    store: Arc<dyn RepositoryStore>,
    github: Arc<dyn GithubApi>,
}

impl RepositoryService {
    pub fn new(store: Arc<dyn RepositoryStore>, github: Arc<dyn GithubApi>) -> Self {
        Self { store, github }
    }

    pub async fn list(&self) -> Result<Vec<Repo>, ListReposError> {
        let rows = self.store.list().await?;
        Ok(rows.into_iter().map(Repo::from).collect())
    }

    pub async fn get(&self, owner: &str, name: &str) -> Result<Repo, GetRepoError> {
        self.store
            .get_by_name_and_owner(name, owner)
            .await?
            .map(Repo::from)
            .ok_or_else(|| GetRepoError::NotFound {
                owner: owner.to_owned(),
                name: name.to_owned(),
            })
    }

    /// Starts tracking `owner/name` once it is confirmed to exist upstream.
    ///
    /// The lookup skips the upstream call for repositories already tracked; a
    /// concurrent add that slips past it is caught by the unique index and
    /// reported the same way.
    pub async fn add(&self, owner: &str, name: &str) -> Result<Repo, AddRepoError> {
        let owner = non_empty(owner, "owner")?;
        let name = non_empty(name, "name")?;

        match self.store.get_by_name_and_owner(name, owner).await {
            Ok(None) => {}
            Ok(Some(_)) => {
                return Err(AddRepoError::AlreadyExists {
                    owner: owner.to_owned(),
                    name: name.to_owned(),
                })
            }
            Err(source) => return Err(AddRepoError::Lookup { source }),
        }

        self.github
            .fetch_repository(owner, name)
            .await
            .map_err(|source| match source {
                FetchRepositoryError::NotFound { owner, name } => {
                    warn!(%owner, %name, "repository not found upstream");
                    AddRepoError::NotFoundUpstream { owner, name }
                }
                source => AddRepoError::Upstream { source },
            })?;

        let entity = self
            .store
            .add(owner, name)
            .await
            .map_err(|source| match source {
                StoreError::AlreadyExists { owner, name } => {
                    AddRepoError::AlreadyExists { owner, name }
                }
                source => AddRepoError::Insert { source },
            })?;

        info!(id = %entity.id, owner, name, "repository tracked");
        Ok(entity.into())
    }

    /// Stops tracking `id` and returns the row that was removed.
    pub async fn delete(&self, id: Uuid) -> Result<Repo, DeleteRepoError> {
        let deleted = self
            .store
            .delete(id)
            .await?
            .ok_or(DeleteRepoError::NotFound { id })?;

        info!(%id, owner = %deleted.owner, name = %deleted.name, "repository untracked");
        Ok(deleted.into())
    }
}

fn non_empty<'a>(value: &'a str, field: &'static str) -> Result<&'a str, AddRepoError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AddRepoError::InvalidInput { field });
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use interfaces_github_repos::{ApiRepository, MockGithubApi};
    use rstest::rstest;

    use super::*;
    use crate::db::repository::store::MockRepositoryStore;
    use crate::services::error::{Classify, ErrorKind};
    use crate::test_support::{repository, InMemoryStore};

    fn upstream_has_repo(owner: &'static str, name: &'static str) -> MockGithubApi {
        let mut github = MockGithubApi::new();
        github
            .expect_fetch_repository()
            .withf(move |o, n| o == owner && n == name)
            .times(1)
            .returning(|_, _| Ok(ApiRepository::default()));
        github
    }

    fn upstream_untouched() -> MockGithubApi {
        let mut github = MockGithubApi::new();
        github.expect_fetch_repository().times(0);
        github.expect_fetch_pull_requests().times(0);
        github
    }

    fn service(store: Arc<InMemoryStore>, github: MockGithubApi) -> RepositoryService {
        RepositoryService::new(store, Arc::new(github))
    }

    fn cancelled() -> StoreError {
        StoreError::Cancelled {
            after: Duration::from_millis(5),
        }
    }

    #[tokio::test]
    async fn list_is_empty_without_rows() {
        let svc = service(Arc::new(InMemoryStore::default()), upstream_untouched());
        let repos = svc.list().await.expect("list should succeed");
        assert!(repos.is_empty());
    }

    #[tokio::test]
    async fn list_is_stable_across_calls() {
        let rows = vec![repository("a", "one"), repository("b", "two"), repository("c", "three")];
        let expected: Vec<Repo> = rows.iter().cloned().map(Repo::from).collect();
        let svc = service(Arc::new(InMemoryStore::with_rows(rows)), upstream_untouched());

        for _ in 0..3 {
            assert_eq!(svc.list().await.expect("list should succeed"), expected);
        }
    }

    #[tokio::test]
    async fn list_store_failure_is_internal() {
        let mut store = MockRepositoryStore::new();
        store.expect_list().returning(|| Err(cancelled()));
        let svc = RepositoryService::new(Arc::new(store), Arc::new(upstream_untouched()));

        let error = svc.list().await.expect_err("list should fail");
        assert_eq!(error.kind(), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn get_returns_tracked_repository() {
        let row = repository("octo", "hello");
        let svc = service(
            Arc::new(InMemoryStore::with_rows(vec![row.clone()])),
            upstream_untouched(),
        );

        let repo = svc.get("octo", "hello").await.expect("get should succeed");
        assert_eq!(repo, Repo::from(row));
    }

    #[tokio::test]
    async fn get_untracked_is_not_found() {
        let svc = service(
            Arc::new(InMemoryStore::with_rows(vec![repository("octo", "hello")])),
            upstream_untouched(),
        );

        let error = svc.get("octo", "other").await.expect_err("get should fail");
        assert!(
            matches!(&error, GetRepoError::NotFound { owner, name } if owner == "octo" && name == "other"),
            "expected NotFound, got {error:?}"
        );
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn add_tracks_upstream_repository_and_get_returns_same_id() {
        let store = Arc::new(InMemoryStore::default());
        let svc = service(store.clone(), upstream_has_repo("octo", "hello"));

        let added = svc.add("octo", "hello").await.expect("add should succeed");
        assert!(!added.id.is_nil());
        assert_eq!((added.owner.as_str(), added.name.as_str()), ("octo", "hello"));

        let fetched = svc.get("octo", "hello").await.expect("get should succeed");
        assert_eq!(fetched.id, added.id);
        assert_eq!(store.rows().len(), 1);
    }

    #[tokio::test]
    async fn add_trims_owner_and_name() {
        let store = Arc::new(InMemoryStore::default());
        let svc = service(store.clone(), upstream_has_repo("octo", "hello"));

        let added = svc.add("  octo ", "hello\n").await.expect("add should succeed");
        assert_eq!((added.owner.as_str(), added.name.as_str()), ("octo", "hello"));
    }

    #[tokio::test]
    async fn add_missing_upstream_is_not_found_and_persists_nothing() {
        let store = Arc::new(InMemoryStore::default());
        let mut github = MockGithubApi::new();
        github.expect_fetch_repository().times(1).returning(|owner, name| {
            Err(FetchRepositoryError::NotFound {
                owner: owner.to_owned(),
                name: name.to_owned(),
            })
        });
        let svc = service(store.clone(), github);

        let error = svc.add("octo", "ghost").await.expect_err("add should fail");
        assert!(
            matches!(error, AddRepoError::NotFoundUpstream { .. }),
            "expected NotFoundUpstream, got {error:?}"
        );
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert!(store.rows().is_empty());
    }

    #[tokio::test]
    async fn add_already_tracked_is_rejected_without_calling_upstream() {
        let store = Arc::new(InMemoryStore::with_rows(vec![repository("octo", "hello")]));
        let svc = service(store.clone(), upstream_untouched());

        let error = svc.add("octo", "hello").await.expect_err("add should fail");
        assert_eq!(error.kind(), ErrorKind::AlreadyExists);
        assert_eq!(store.rows().len(), 1);
    }

    #[tokio::test]
    async fn add_losing_insert_race_reports_already_exists() {
        let mut store = MockRepositoryStore::new();
        store
            .expect_get_by_name_and_owner()
            .returning(|_, _| Ok(None));
        store.expect_add().times(1).returning(|owner, name| {
            Err(StoreError::AlreadyExists {
                owner: owner.to_owned(),
                name: name.to_owned(),
            })
        });
        let svc = RepositoryService::new(
            Arc::new(store),
            Arc::new(upstream_has_repo("octo", "hello")),
        );

        let error = svc.add("octo", "hello").await.expect_err("add should fail");
        assert!(
            matches!(error, AddRepoError::AlreadyExists { .. }),
            "expected AlreadyExists, got {error:?}"
        );
    }

    #[tokio::test]
    async fn add_lookup_failure_is_internal_and_skips_upstream() {
        let mut store = MockRepositoryStore::new();
        store
            .expect_get_by_name_and_owner()
            .returning(|_, _| Err(cancelled()));
        store.expect_add().times(0);
        let svc = RepositoryService::new(Arc::new(store), Arc::new(upstream_untouched()));

        let error = svc.add("octo", "hello").await.expect_err("add should fail");
        assert!(matches!(error, AddRepoError::Lookup { .. }), "got {error:?}");
        assert_eq!(error.kind(), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn add_upstream_failure_is_internal_and_persists_nothing() {
        let store = Arc::new(InMemoryStore::default());
        let mut github = MockGithubApi::new();
        github.expect_fetch_repository().returning(|_, _| {
            Err(FetchRepositoryError::UnexpectedStatus {
                status: StatusCode::FORBIDDEN,
                body: "rate limited".to_owned(),
            })
        });
        let svc = service(store.clone(), github);

        let error = svc.add("octo", "hello").await.expect_err("add should fail");
        assert!(matches!(error, AddRepoError::Upstream { .. }), "got {error:?}");
        assert_eq!(error.kind(), ErrorKind::Internal);
        assert!(store.rows().is_empty());
    }

    #[rstest]
    #[case("", "hello", "owner")]
    #[case("octo", "   ", "name")]
    #[case(" \t", "", "owner")]
    #[tokio::test]
    async fn add_rejects_blank_input(
        #[case] owner: &str,
        #[case] name: &str,
        #[case] field: &str,
    ) {
        let store = Arc::new(InMemoryStore::default());
        let svc = service(store.clone(), upstream_untouched());

        let error = svc.add(owner, name).await.expect_err("add should fail");
        assert!(
            matches!(error, AddRepoError::InvalidInput { field: f } if f == field),
            "expected InvalidInput({field}), got {error:?}"
        );
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        assert!(store.rows().is_empty());
    }

    #[tokio::test]
    async fn delete_returns_removed_repository() {
        let row = repository("octo", "hello");
        let store = Arc::new(InMemoryStore::with_rows(vec![row.clone()]));
        let svc = service(store.clone(), upstream_untouched());

        let deleted = svc.delete(row.id).await.expect("delete should succeed");
        assert_eq!(deleted, Repo::from(row.clone()));
        assert!(store.rows().is_empty());

        let again = svc.delete(row.id).await.expect_err("second delete should fail");
        assert_eq!(again.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let store = Arc::new(InMemoryStore::with_rows(vec![repository("octo", "hello")]));
        let svc = service(store.clone(), upstream_untouched());
        let id = Uuid::new_v4();

        let error = svc.delete(id).await.expect_err("delete should fail");
        assert!(
            matches!(error, DeleteRepoError::NotFound { id: missing } if missing == id),
            "expected NotFound, got {error:?}"
        );
        assert_eq!(store.rows().len(), 1);
    }
}
