use serde::Serialize;
use sqlx::PgPool;

use crate::auth::jwt::IdentityClaims;
use crate::db;
use crate::db::users::NewUser;
use crate::error::AppError;
use crate::models::{normalize_email, Role, User};

/// How a login resolved the identity to a user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The subject was already bound to a user.
    Existing,
    /// A pre-created user with the same email was bound to the subject.
    Linked,
    /// A new organization and its first administrator were created.
    Created,
}

/// Name given to the organization created on a first login.
pub fn default_organization_name(claims: &IdentityClaims) -> String {
    let full_name = format!("{} {}", claims.first_name.trim(), claims.last_name.trim());
    let full_name = full_name.trim();
    if full_name.is_empty() {
        format!("Entreprise {}", normalize_email(&claims.email))
    } else {
        format!("Entreprise {full_name}")
    }
}

/// Resolves the identity to exactly one user, creating one on first login.
pub async fn provision(pool: &PgPool, claims: &IdentityClaims) -> Result<(Outcome, User), AppError> {
    let email = normalize_email(&claims.email);
    if email.is_empty() {
        return Err(AppError::BadRequest("Identity has no email".to_string()));
    }

    if let Some(user) = db::users::find_by_external_id(pool, &claims.sub).await? {
        let user = refresh_profile(pool, &user, &email, claims).await?;
        return Ok((Outcome::Existing, user));
    }

    if let Some(user) = db::users::find_by_email(pool, &email).await? {
        if user.external_auth_id.is_some() {
            return Err(AppError::Conflict(
                "Email is already bound to another identity".to_string(),
            ));
        }
        if let Some(user) = db::users::link_external_id(pool, user.id, &claims.sub).await? {
            tracing::info!(user_id = %user.id, "Linked identity to existing user");
            let user = refresh_profile(pool, &user, &email, claims).await?;
            return Ok((Outcome::Linked, user));
        }
        // Lost a race against a concurrent link of the same row.
        return reread(pool, claims).await;
    }

    match create_with_organization(pool, &email, claims).await {
        Ok(user) => {
            tracing::info!(
                user_id = %user.id,
                organization_id = %user.organization_id,
                "Provisioned new organization"
            );
            Ok((Outcome::Created, user))
        }
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            reread(pool, claims).await
        }
        Err(e) => Err(e.into()),
    }
}

async fn refresh_profile(
    pool: &PgPool,
    user: &User,
    email: &str,
    claims: &IdentityClaims,
) -> Result<User, AppError> {
    db::users::update_profile(pool, user.id, email, &claims.first_name, &claims.last_name)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "Email is already in use"))
}

async fn create_with_organization(
    pool: &PgPool,
    email: &str,
    claims: &IdentityClaims,
) -> Result<User, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let organization =
        db::organizations::create(&mut *tx, &default_organization_name(claims), email).await?;

    let user = db::users::create(
        &mut *tx,
        &NewUser {
            organization_id: organization.id,
            external_auth_id: Some(&claims.sub),
            last_name: claims.last_name.trim(),
            first_name: claims.first_name.trim(),
            email,
            phone: None,
            role: Role::AdminEntreprise,
        },
    )
    .await?;

    tx.commit().await?;
    Ok(user)
}

async fn reread(pool: &PgPool, claims: &IdentityClaims) -> Result<(Outcome, User), AppError> {
    db::users::find_by_external_id(pool, &claims.sub)
        .await?
        .map(|user| (Outcome::Existing, user))
        .ok_or_else(|| AppError::Conflict("Email is already in use".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organization_is_named_after_the_person() {
        let claims = IdentityClaims::new("sub-1", "bob@x.com", "Bob", "Martin");
        assert_eq!(default_organization_name(&claims), "Entreprise Bob Martin");
    }

    #[test]
    fn nameless_identity_falls_back_to_email() {
        let claims = IdentityClaims::new("sub-1", " Bob@X.com", "", " ");
        assert_eq!(default_organization_name(&claims), "Entreprise bob@x.com");
    }

    #[test]
    fn outcomes_serialize_in_snake_case() {
        assert_eq!(serde_json::to_string(&Outcome::Linked).unwrap(), "\"linked\"");
    }
}
