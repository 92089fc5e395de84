//! In-memory `RepositoryStore` for service and router tests.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::repository::models::Repository;
use crate::db::repository::store::{RepositoryStore, StoreError};

/// Enforces `(name, owner)` uniqueness the way the unique index does.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    rows: Mutex<Vec<Repository>>,
}

impl InMemoryStore {
    pub fn with_rows(rows: Vec<Repository>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    pub fn rows(&self) -> Vec<Repository> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Repository>> {
        self.rows.lock().expect("store lock should not be poisoned")
    }
}

pub fn repository(owner: &str, name: &str) -> Repository {
    Repository {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        owner: owner.to_owned(),
    }
}

#[async_trait]
impl RepositoryStore for InMemoryStore {
    async fn list(&self) -> Result<Vec<Repository>, StoreError> {
        Ok(self.rows())
    }

    async fn add(&self, owner: &str, name: &str) -> Result<Repository, StoreError> {
        let mut rows = self.lock();
        if rows.iter().any(|row| row.owner == owner && row.name == name) {
            return Err(StoreError::AlreadyExists {
                owner: owner.to_owned(),
                name: name.to_owned(),
            });
        }
        let row = repository(owner, name);
        rows.push(row.clone());
        Ok(row)
    }

    async fn get_by_name_and_owner(
        &self,
        name: &str,
        owner: &str,
    ) -> Result<Option<Repository>, StoreError> {
        Ok(self
            .lock()
            .iter()
            .find(|row| row.owner == owner && row.name == name)
            .cloned())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Repository>, StoreError> {
        Ok(self.lock().iter().find(|row| row.id == id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Repository>, StoreError> {
        let mut rows = self.lock();
        let index = rows.iter().position(|row| row.id == id);
        Ok(index.map(|index| rows.remove(index)))
    }
}
