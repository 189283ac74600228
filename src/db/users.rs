use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Role, User};

pub struct NewUser<'a> {
    pub organization_id: Uuid,
    pub external_auth_id: Option<&'a str>,
    pub last_name: &'a str,
    pub first_name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub role: Role,
}

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    user: &NewUser<'_>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (organization_id, external_auth_id, last_name, first_name, email, phone, role)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(user.organization_id)
    .bind(user.external_auth_id)
    .bind(user.last_name)
    .bind(user.first_name)
    .bind(user.email)
    .bind(user.phone)
    .bind(user.role)
    .fetch_one(executor)
    .await
}

pub async fn find_by_external_id<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    external_auth_id: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE external_auth_id = $1")
        .bind(external_auth_id)
        .fetch_optional(executor)
        .await
}

/// Case-insensitive lookup; emails are unique on `lower(email)`.
pub async fn find_by_email<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE lower(email) = lower($1)")
        .bind(email.trim())
        .fetch_optional(executor)
        .await
}

pub async fn find_by_id(
    pool: &PgPool,
    id: Uuid,
    organization_id: Uuid,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND organization_id = $2")
        .bind(id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_by_organization(
    pool: &PgPool,
    organization_id: Uuid,
) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE organization_id = $1 ORDER BY last_name, first_name",
    )
    .bind(organization_id)
    .fetch_all(pool)
    .await
}

/// Unscoped lookup, for display across organizations.
pub async fn find_by_id_global(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Refreshes profile fields from the identity provider's claims.
pub async fn update_profile<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    email: &str,
    first_name: &str,
    last_name: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET
            email = $2,
            first_name = COALESCE(NULLIF($3, ''), first_name),
            last_name = COALESCE(NULLIF($4, ''), last_name)
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(email)
    .bind(first_name)
    .bind(last_name)
    .fetch_one(executor)
    .await
}

/// Binds an external subject to a user row that has none yet.
pub async fn link_external_id<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    external_auth_id: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET external_auth_id = $2
         WHERE id = $1 AND external_auth_id IS NULL RETURNING *",
    )
    .bind(id)
    .bind(external_auth_id)
    .fetch_optional(executor)
    .await
}

/// Moves a user into `organization_id` with `role`.
pub async fn assign_membership<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    organization_id: Uuid,
    role: Role,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET organization_id = $2, role = $3 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(organization_id)
    .bind(role)
    .fetch_one(executor)
    .await
}

pub async fn update_role(
    pool: &PgPool,
    id: Uuid,
    organization_id: Uuid,
    role: Role,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET role = $3 WHERE id = $1 AND organization_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(organization_id)
    .bind(role)
    .fetch_one(pool)
    .await
}

/// Unscoped role change used by the promotion flow.
pub async fn set_role(pool: &PgPool, id: Uuid, role: Role) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>("UPDATE users SET role = $2 WHERE id = $1 RETURNING *")
        .bind(id)
        .bind(role)
        .fetch_one(pool)
        .await
}

pub async fn delete(pool: &PgPool, id: Uuid, organization_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1 AND organization_id = $2")
        .bind(id)
        .bind(organization_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
