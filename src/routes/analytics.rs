//! Analytics routes: blood availability per group and organisation totals.
//!
//! The organisation is always the authenticated caller. Dashboards also send
//! a `userId` query parameter, which is not read.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::services::analytics::{self, BloodGroupData, OrganisationStats};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodGroupPayload {
    pub blood_group_data: Vec<BloodGroupData>,
}

#[derive(Debug, Serialize)]
pub struct StatsPayload {
    pub data: OrganisationStats,
}

/// GET /api/v1/analytics/bloodGroups-data — in/out/available for all eight groups.
pub async fn blood_groups_data(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<BloodGroupPayload>>, AppError> {
    let blood_group_data = analytics::blood_group_breakdown(&state.db, current_user.id)
        .await
        .map_err(|e| e.in_endpoint("Error in blood group data analytics API"))?;

    Ok(ApiResponse::success(
        "Blood group data fetched successfully",
        BloodGroupPayload { blood_group_data },
    ))
}

/// GET /api/v1/analytics/stats — organisation totals and latest transactions.
pub async fn stats(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<StatsPayload>>, AppError> {
    let data = analytics::organisation_stats(&state.db, current_user.id)
        .await
        .map_err(|e| e.in_endpoint("Error in stats API"))?;

    Ok(ApiResponse::success("Stats fetched successfully", StatsPayload { data }))
}
