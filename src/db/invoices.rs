use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Invoice, InvoiceChanges, InvoiceStatus, NewInvoice};

pub async fn list(pool: &PgPool, organization_id: Uuid) -> Result<Vec<Invoice>, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(
        "SELECT * FROM invoices WHERE organization_id = $1 ORDER BY date DESC",
    )
    .bind(organization_id)
    .fetch_all(pool)
    .await
}

pub async fn list_by_client(
    pool: &PgPool,
    client_id: Uuid,
    organization_id: Uuid,
) -> Result<Vec<Invoice>, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(
        "SELECT * FROM invoices WHERE client_id = $1 AND organization_id = $2 ORDER BY date DESC",
    )
    .bind(client_id)
    .bind(organization_id)
    .fetch_all(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    organization_id: Uuid,
    invoice: &NewInvoice,
) -> Result<Invoice, sqlx::Error> {
    let paid = invoice.paid_amount.unwrap_or(Decimal::ZERO);
    sqlx::query_as::<_, Invoice>(
        "INSERT INTO invoices (organization_id, client_id, number, date, due_at, total_amount,
                               paid_amount, status, notes)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
    )
    .bind(organization_id)
    .bind(invoice.client_id)
    .bind(&invoice.number)
    .bind(invoice.date.unwrap_or_else(Utc::now))
    .bind(invoice.due_at)
    .bind(invoice.total_amount)
    .bind(paid)
    .bind(InvoiceStatus::from_amounts(invoice.total_amount, paid))
    .bind(&invoice.notes)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(
    pool: &PgPool,
    id: Uuid,
    organization_id: Uuid,
) -> Result<Option<Invoice>, sqlx::Error> {
    sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1 AND organization_id = $2")
        .bind(id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await
}

/// Applies `changes`; `total`/`paid` are the merged amounts, which also fix the status.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    organization_id: Uuid,
    changes: &InvoiceChanges,
    total: Decimal,
    paid: Decimal,
) -> Result<Invoice, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(
        "UPDATE invoices SET
            client_id = COALESCE($3, client_id),
            number = COALESCE($4, number),
            date = COALESCE($5, date),
            due_at = COALESCE($6, due_at),
            total_amount = $7,
            paid_amount = $8,
            status = $9,
            notes = COALESCE($10, notes)
         WHERE id = $1 AND organization_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(organization_id)
    .bind(changes.client_id)
    .bind(&changes.number)
    .bind(changes.date)
    .bind(changes.due_at)
    .bind(total)
    .bind(paid)
    .bind(InvoiceStatus::from_amounts(total, paid))
    .bind(&changes.notes)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid, organization_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM invoices WHERE id = $1 AND organization_id = $2")
        .bind(id)
        .bind(organization_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
