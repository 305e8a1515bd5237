//! Route definitions for the blood bank API.

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod health;
pub mod inventory;

use axum::http::HeaderValue;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// CORS for the dashboard origin; any origin if the configured one is not a valid header value.
fn cors_layer(frontend_url: &str) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match HeaderValue::from_str(frontend_url) {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            tracing::warn!(error = %e, frontend_url, "Invalid FRONTEND_URL, allowing any origin");
            cors.allow_origin(Any)
        }
    }
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/current-user", get(auth::current_user));

    let inventory_routes = Router::new()
        .route("/inventory/create-inventory", post(inventory::create))
        .route("/inventory/get-inventory", get(inventory::list))
        .route(
            "/inventory/get-recent-inventory",
            get(inventory::recent).post(inventory::recent_filtered),
        )
        .route("/inventory/get-inventory-hospital", post(inventory::search))
        .route("/inventory/get-donars", get(inventory::donors))
        .route("/inventory/get-hospitals", get(inventory::hospitals))
        .route(
            "/inventory/get-orgnaisation",
            get(inventory::organisations_for_donor),
        )
        .route(
            "/inventory/get-orgnaisation-for-hospital",
            get(inventory::organisations_for_hospital),
        );

    let analytics_routes = Router::new()
        .route(
            "/analytics/bloodGroups-data",
            get(analytics::blood_groups_data),
        )
        .route("/analytics/stats", get(analytics::stats));

    let admin_routes = Router::new()
        .route("/admin/donor-list", get(admin::donor_list))
        .route("/admin/hospital-list", get(admin::hospital_list))
        .route("/admin/org-list", get(admin::org_list))
        .route("/admin/delete-donar/{id}", delete(admin::delete_donor))
        .route("/admin/delete-hospital/{id}", delete(admin::delete_hospital))
        .route(
            "/admin/delete-organization/{id}",
            delete(admin::delete_organisation),
        );

    let cors = cors_layer(&state.config.frontend_url);

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest(
            "/api/v1",
            auth_routes
                .merge(inventory_routes)
                .merge(analytics_routes)
                .merge(admin_routes),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
