use time::PrimitiveDateTime;

use crate::db::models::User;

const COLUMNS: &str = "id, email, display_name, is_active, created_at, updated_at";

pub(crate) async fn find_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub(crate) struct CreateUser<'a> {
    pub id: &'a str,
    pub email: &'a str,
    pub display_name: &'a str,
    pub is_active: bool,
    pub created_at: PrimitiveDateTime,
}

/// Accounts are provisioned by the identity provider; the API only reads them.
#[cfg_attr(not(test), allow(dead_code))]
pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateUser<'_>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (id, email, display_name, is_active, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $5)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.email)
    .bind(params.display_name)
    .bind(params.is_active)
    .bind(params.created_at)
    .fetch_one(executor)
    .await
}
