use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{NewTransaction, Transaction, TransactionChanges};

pub async fn list(pool: &PgPool, organization_id: Uuid) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(
        "SELECT * FROM transactions WHERE organization_id = $1 ORDER BY date DESC",
    )
    .bind(organization_id)
    .fetch_all(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    organization_id: Uuid,
    transaction: &NewTransaction,
) -> Result<Transaction, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(
        "INSERT INTO transactions (organization_id, kind, amount, date, category, description,
                                   vehicle_id, client_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
    )
    .bind(organization_id)
    .bind(transaction.kind)
    .bind(transaction.amount)
    .bind(transaction.date.unwrap_or_else(Utc::now))
    .bind(&transaction.category)
    .bind(&transaction.description)
    .bind(transaction.vehicle_id)
    .bind(transaction.client_id)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(
    pool: &PgPool,
    id: Uuid,
    organization_id: Uuid,
) -> Result<Option<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(
        "SELECT * FROM transactions WHERE id = $1 AND organization_id = $2",
    )
    .bind(id)
    .bind(organization_id)
    .fetch_optional(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    organization_id: Uuid,
    changes: &TransactionChanges,
) -> Result<Transaction, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(
        "UPDATE transactions SET
            kind = COALESCE($3, kind),
            amount = COALESCE($4, amount),
            date = COALESCE($5, date),
            category = COALESCE($6, category),
            description = COALESCE($7, description),
            vehicle_id = COALESCE($8, vehicle_id),
            client_id = COALESCE($9, client_id)
         WHERE id = $1 AND organization_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(organization_id)
    .bind(changes.kind)
    .bind(changes.amount)
    .bind(changes.date)
    .bind(&changes.category)
    .bind(&changes.description)
    .bind(changes.vehicle_id)
    .bind(changes.client_id)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid, organization_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM transactions WHERE id = $1 AND organization_id = $2")
        .bind(id)
        .bind(organization_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
