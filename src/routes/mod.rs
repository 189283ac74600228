pub mod admin;
pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod drivers;
pub mod fuel;
pub mod invitations;
pub mod invoices;
pub mod maintenance;
pub mod promote;
pub mod settings;
pub mod transactions;
pub mod users;
pub mod vehicles;

use axum::routing::{get, patch, post};
use axum::{Json, Router};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{self, Owned};
use crate::error::AppError;
use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/auth/user", get(auth::current_user))
        .route("/api/auth/login", post(auth::login))
        // Vehicles
        .route("/api/vehicles", get(vehicles::list).post(vehicles::create))
        .route(
            "/api/vehicles/{id}",
            get(vehicles::get)
                .patch(vehicles::update)
                .delete(vehicles::delete),
        )
        .route("/api/vehicles/{id}/fuel", get(vehicles::fuel))
        .route("/api/vehicles/{id}/maintenance", get(vehicles::maintenance))
        // Drivers
        .route("/api/drivers", get(drivers::list).post(drivers::create))
        .route(
            "/api/drivers/{id}",
            get(drivers::get)
                .patch(drivers::update)
                .delete(drivers::delete),
        )
        // Clients
        .route("/api/clients", get(clients::list).post(clients::create))
        .route(
            "/api/clients/{id}",
            get(clients::get)
                .patch(clients::update)
                .delete(clients::delete),
        )
        .route("/api/clients/{id}/invoices", get(clients::invoices))
        // Fuel
        .route("/api/fuel", get(fuel::list).post(fuel::create))
        .route(
            "/api/fuel/{id}",
            get(fuel::get).patch(fuel::update).delete(fuel::delete),
        )
        // Maintenance
        .route(
            "/api/maintenance",
            get(maintenance::list).post(maintenance::create),
        )
        .route("/api/maintenance/upcoming", get(maintenance::upcoming))
        .route(
            "/api/maintenance/{id}",
            get(maintenance::get)
                .patch(maintenance::update)
                .delete(maintenance::delete),
        )
        // Treasury
        .route(
            "/api/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/api/transactions/{id}",
            get(transactions::get)
                .patch(transactions::update)
                .delete(transactions::delete),
        )
        // Invoices
        .route("/api/invoices", get(invoices::list).post(invoices::create))
        .route(
            "/api/invoices/{id}",
            get(invoices::get)
                .patch(invoices::update)
                .delete(invoices::delete),
        )
        // Organization
        .route("/api/settings", get(settings::get).put(settings::update))
        .route("/api/users", get(users::list).post(users::create))
        .route(
            "/api/users/{id}",
            patch(users::update_role).delete(users::delete),
        )
        .route("/api/dashboard/stats", get(dashboard::stats))
        // Invitations
        .route("/api/invitations/{token}", get(invitations::inspect))
        .route("/api/invitations/{token}/accept", post(invitations::accept))
        // Super admin
        .route("/api/admin/promote", post(promote::promote))
        .route("/api/admin/organizations", get(admin::list_organizations))
        .route(
            "/api/admin/organizations/{id}",
            patch(admin::update_organization),
        )
        .route(
            "/api/admin/organizations/{id}/stats",
            get(admin::organization_stats),
        )
        .route(
            "/api/admin/organizations/{id}/settings",
            get(admin::get_organization_settings).patch(admin::update_organization_settings),
        )
        .route("/api/admin/organizations/{id}/invite", post(admin::invite))
        .route(
            "/api/admin/subscriptions/alerts",
            get(admin::subscription_alerts),
        )
}

/// Rejects a payload reference to a row outside the caller's organization.
pub(crate) async fn ensure_reference(
    pool: &PgPool,
    kind: Owned,
    id: Option<Uuid>,
    organization_id: Uuid,
) -> Result<(), AppError> {
    let Some(id) = id else {
        return Ok(());
    };
    if db::owned_by(pool, kind, id, organization_id).await? {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Referenced {} not found",
            kind.label()
        )))
    }
}

pub(crate) fn require_found(found: bool, message: &str) -> Result<(), AppError> {
    if found {
        Ok(())
    } else {
        Err(AppError::NotFound(message.to_string()))
    }
}

pub(crate) fn deleted() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "success": true }))
}
