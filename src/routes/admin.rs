//! Admin routes: account listings per role and account removal.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError, NoPayload};
use crate::middleware::rbac::RequireAdmin;
use crate::models::user::{UserRole, UserSummary};
use crate::services::admin as admin_service;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct DonorListPayload {
    #[serde(rename = "TotalCount")]
    pub total_count: usize,
    #[serde(rename = "donarData")]
    pub donar_data: Vec<UserSummary>,
}

#[derive(Debug, Serialize)]
pub struct HospitalListPayload {
    #[serde(rename = "TotalCount")]
    pub total_count: usize,
    #[serde(rename = "hospitalData")]
    pub hospital_data: Vec<UserSummary>,
}

#[derive(Debug, Serialize)]
pub struct OrgListPayload {
    #[serde(rename = "TotalCount")]
    pub total_count: usize,
    #[serde(rename = "orgData")]
    pub org_data: Vec<UserSummary>,
}

/// GET /api/v1/admin/donor-list
pub async fn donor_list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<DonorListPayload>>, AppError> {
    let listing = admin_service::list_by_role(&state.db, UserRole::Donor).await?;
    Ok(ApiResponse::success(
        "Donor list fetched successfully",
        DonorListPayload {
            total_count: listing.total,
            donar_data: listing.users,
        },
    ))
}

/// GET /api/v1/admin/hospital-list
pub async fn hospital_list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<HospitalListPayload>>, AppError> {
    let listing = admin_service::list_by_role(&state.db, UserRole::Hospital).await?;
    Ok(ApiResponse::success(
        "Hospital list fetched successfully",
        HospitalListPayload {
            total_count: listing.total,
            hospital_data: listing.users,
        },
    ))
}

/// GET /api/v1/admin/org-list
pub async fn org_list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<OrgListPayload>>, AppError> {
    let listing = admin_service::list_by_role(&state.db, UserRole::Organisation).await?;
    Ok(ApiResponse::success(
        "Organisation list fetched successfully",
        OrgListPayload {
            total_count: listing.total,
            org_data: listing.users,
        },
    ))
}

/// DELETE /api/v1/admin/delete-donar/{id}
pub async fn delete_donor(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<NoPayload>>, AppError> {
    admin_service::delete_user(&state.db, UserRole::Donor, id).await?;
    Ok(ApiResponse::message("Donor record deleted successfully"))
}

/// DELETE /api/v1/admin/delete-hospital/{id}
pub async fn delete_hospital(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<NoPayload>>, AppError> {
    admin_service::delete_user(&state.db, UserRole::Hospital, id).await?;
    Ok(ApiResponse::message("Hospital record deleted successfully"))
}

/// DELETE /api/v1/admin/delete-organization/{id}
pub async fn delete_organisation(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<NoPayload>>, AppError> {
    admin_service::delete_user(&state.db, UserRole::Organisation, id).await?;
    Ok(ApiResponse::message("Organisation record deleted successfully"))
}
