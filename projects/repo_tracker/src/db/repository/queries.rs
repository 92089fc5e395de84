use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;
use crate::db::repository::models::*;

#[derive(Debug, thiserror::Error)]
pub enum ListRepositoriesError {
    #[error("ListRepositories: {source}")]
    ListRepositories{
        #[from]
        source: DieselError
    },
}

/// Rows in storage order; no ORDER BY is applied.
pub fn list_repositories(
    conn: &mut PgConnection
) -> Result<Vec<Repository>, ListRepositoriesError> {
    use crate::db::schema::repositories::dsl::*;

    repositories
        .select(Repository::as_select())
        .load(conn)
        .map_err(|source| ListRepositoriesError::ListRepositories{ source })
}

#[derive(Debug, thiserror::Error)]
pub enum InsertRepositoryError {
    #[error("repository {owner}/{name} already exists")]
    AlreadyExists{
        owner: String,
        name: String,
    },
    #[error("InsertRepository: {source}")]
    InsertRepository{
        source: DieselError
    },
}

/// Inserts `new`; the `(name, owner)` unique index turns a duplicate into
/// `AlreadyExists`.
pub fn insert_repository(
    conn: &mut PgConnection,
    new: &NewRepository
) -> Result<Repository, InsertRepositoryError> {
    use crate::db::schema::repositories::dsl::*;

    diesel::insert_into(repositories)
        .values(new)
        .returning(Repository::as_returning())
        .get_result(conn)
        .map_err(|source| match source {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                InsertRepositoryError::AlreadyExists{
                    owner: new.owner.to_owned(),
                    name: new.name.to_owned(),
                }
            }
            source => InsertRepositoryError::InsertRepository{ source },
        })
}

#[derive(Debug, thiserror::Error)]
pub enum GetRepositoryByNameError {
    #[error("GetRepositoryByName: {source}")]
    GetRepositoryByName{
        #[from]
        source: DieselError
    },
}

pub fn get_repository_by_name(
    conn: &mut PgConnection,
    owner_val: &str,
    name_val: &str
) -> Result<Option<Repository>, GetRepositoryByNameError> {
    use crate::db::schema::repositories::dsl::*;

    repositories
        .filter(owner.eq(owner_val))
        .filter(name.eq(name_val))
        .select(Repository::as_select())
        .first(conn)
        .optional()
        .map_err(|source| GetRepositoryByNameError::GetRepositoryByName{ source })
}

#[derive(Debug, thiserror::Error)]
pub enum GetRepositoryByIdError {
    #[error("GetRepositoryById: {source}")]
    GetRepositoryById{
        #[from]
        source: DieselError
    },
}

pub fn get_repository_by_id(
    conn: &mut PgConnection,
    id_val: Uuid
) -> Result<Option<Repository>, GetRepositoryByIdError> {
    use crate::db::schema::repositories::dsl::*;

    repositories
        .find(id_val)
        .select(Repository::as_select())
        .first(conn)
        .optional()
        .map_err(|source| GetRepositoryByIdError::GetRepositoryById{ source })
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteRepositoryError {
    #[error("DeleteRepository: {source}")]
    DeleteRepository{
        #[from]
        source: DieselError
    },
}

/// Deletes by id in one statement and hands back the removed row, `None` when
/// nothing matched.
pub fn delete_repository(
    conn: &mut PgConnection,
    id_val: Uuid
) -> Result<Option<Repository>, DeleteRepositoryError> {
    use crate::db::schema::repositories::dsl::*;

    diesel::delete(repositories.find(id_val))
        .returning(Repository::as_returning())
        .get_result(conn)
        .optional()
        .map_err(|source| DeleteRepositoryError::DeleteRepository{ source })
}
