//! Inventory routes: record donations and issues, list rows and counterparts.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::errors::{ApiResponse, AppError, NoPayload};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireOrganisation;
use crate::models::inventory::{CreateInventory, InventoryDetail, InventoryFilters};
use crate::models::user::{UserRole, UserSummary};
use crate::services::inventory::{self as inventory_service, Counterparts};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct InventoryPayload {
    pub inventory: Vec<InventoryDetail>,
}

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub filters: InventoryFilters,
}

#[derive(Debug, Serialize)]
pub struct DonorsPayload {
    pub donars: Vec<UserSummary>,
}

#[derive(Debug, Serialize)]
pub struct HospitalsPayload {
    pub hospitals: Vec<UserSummary>,
}

#[derive(Debug, Serialize)]
pub struct OrganisationsPayload {
    pub organisations: Vec<UserSummary>,
}

/// POST /api/v1/inventory/create-inventory
pub async fn create(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<CreateInventory>,
) -> Result<(StatusCode, Json<ApiResponse<NoPayload>>), AppError> {
    inventory_service::create(&state.db, current_user.id, current_user.role, &body).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::message("New blood record added"),
    ))
}

/// GET /api/v1/inventory/get-inventory — all rows of the caller's organisation.
pub async fn list(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<InventoryPayload>>, AppError> {
    let inventory = inventory_service::list_for_organisation(&state.db, current_user.id).await?;
    Ok(ApiResponse::success(
        "Inventory records fetched successfully",
        InventoryPayload { inventory },
    ))
}

/// GET /api/v1/inventory/get-recent-inventory
pub async fn recent(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<InventoryPayload>>, AppError> {
    let inventory = inventory_service::recent_for_organisation(&state.db, current_user.id).await?;
    Ok(ApiResponse::success(
        "Recent inventory data",
        InventoryPayload { inventory },
    ))
}

/// POST /api/v1/inventory/get-recent-inventory — newest rows matching filters.
///
/// Used by donor and hospital dashboards, which have no inventory of their own.
pub async fn recent_filtered(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<FilterRequest>,
) -> Result<Json<ApiResponse<InventoryPayload>>, AppError> {
    ensure_involved(&current_user, &body.filters)?;

    let inventory = inventory_service::recent_filtered(&state.db, &body.filters).await?;
    Ok(ApiResponse::success(
        "Recent inventory data",
        InventoryPayload { inventory },
    ))
}

/// Non-admin callers must appear in the filters as organisation, donor or hospital.
fn ensure_involved(current_user: &CurrentUser, filters: &InventoryFilters) -> Result<(), AppError> {
    if current_user.role != UserRole::Admin && !filters.involves(current_user.id) {
        return Err(AppError::Forbidden(
            "Filters must include your own account".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/v1/inventory/get-inventory-hospital — filtered search.
pub async fn search(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<FilterRequest>,
) -> Result<Json<ApiResponse<InventoryPayload>>, AppError> {
    ensure_involved(&current_user, &body.filters)?;

    let inventory = inventory_service::list_filtered(&state.db, &body.filters).await?;
    Ok(ApiResponse::success(
        "Inventory records fetched successfully",
        InventoryPayload { inventory },
    ))
}

/// GET /api/v1/inventory/get-donars — donors who gave to the caller's organisation.
pub async fn donors(
    State(state): State<AppState>,
    RequireOrganisation(org): RequireOrganisation,
) -> Result<Json<ApiResponse<DonorsPayload>>, AppError> {
    let donars = inventory_service::counterparts(&state.db, Counterparts::DonorsOf, org.id).await?;
    Ok(ApiResponse::success(
        "Donor records fetched successfully",
        DonorsPayload { donars },
    ))
}

/// GET /api/v1/inventory/get-hospitals — hospitals the caller's organisation supplied.
pub async fn hospitals(
    State(state): State<AppState>,
    RequireOrganisation(org): RequireOrganisation,
) -> Result<Json<ApiResponse<HospitalsPayload>>, AppError> {
    let hospitals =
        inventory_service::counterparts(&state.db, Counterparts::HospitalsOf, org.id).await?;
    Ok(ApiResponse::success(
        "Hospitals data fetched successfully",
        HospitalsPayload { hospitals },
    ))
}

/// GET /api/v1/inventory/get-orgnaisation — organisations the calling donor gave to.
pub async fn organisations_for_donor(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<OrganisationsPayload>>, AppError> {
    let organisations = inventory_service::counterparts(
        &state.db,
        Counterparts::OrganisationsOfDonor,
        current_user.id,
    )
    .await?;
    Ok(ApiResponse::success(
        "Organisation data fetched successfully",
        OrganisationsPayload { organisations },
    ))
}

/// GET /api/v1/inventory/get-orgnaisation-for-hospital — organisations that supplied the calling hospital.
pub async fn organisations_for_hospital(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<OrganisationsPayload>>, AppError> {
    let organisations = inventory_service::counterparts(
        &state.db,
        Counterparts::OrganisationsOfHospital,
        current_user.id,
    )
    .await?;
    Ok(ApiResponse::success(
        "Hospital organisation data fetched successfully",
        OrganisationsPayload { organisations },
    ))
}
