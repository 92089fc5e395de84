use uuid::Uuid;
use diesel::prelude::*;
use crate::db::schema::repositories;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = repositories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Repository {
    pub id: Uuid,
    pub name: String,
    pub owner: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = repositories)]
pub struct NewRepository<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub owner: &'a str,
}
