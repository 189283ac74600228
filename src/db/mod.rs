pub mod audit;
pub mod clients;
pub mod dashboard;
pub mod drivers;
pub mod fuel_records;
pub mod invitations;
pub mod invoices;
pub mod maintenance;
pub mod organizations;
pub mod promotion_attempts;
pub mod settings;
pub mod transactions;
pub mod users;
pub mod vehicles;

use sqlx::PgPool;
use uuid::Uuid;

/// Tenant-owned tables that other rows may reference.
#[derive(Debug, Clone, Copy)]
pub enum Owned {
    Vehicle,
    Driver,
    Client,
    User,
}

impl Owned {
    fn table(self) -> &'static str {
        match self {
            Owned::Vehicle => "vehicles",
            Owned::Driver => "drivers",
            Owned::Client => "clients",
            Owned::User => "users",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Owned::Vehicle => "vehicle",
            Owned::Driver => "driver",
            Owned::Client => "client",
            Owned::User => "user",
        }
    }
}

/// Whether row `id` of `kind` belongs to `organization_id`.
pub async fn owned_by(
    pool: &PgPool,
    kind: Owned,
    id: Uuid,
    organization_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1 AND organization_id = $2)",
        kind.table()
    );
    let row: (bool,) = sqlx::query_as(&sql)
        .bind(id)
        .bind(organization_id)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}
