//! Authentication routes: registration, login, current user.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::user::{RegisterUser, UserResponse, UserRole};
use crate::services::auth as auth_service;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Serialize)]
pub struct UserPayload {
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct LoginPayload {
    pub token: String,
    pub user: UserResponse,
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterUser>,
) -> Result<(StatusCode, Json<ApiResponse<UserPayload>>), AppError> {
    let user = auth_service::register(&state.db, &body).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::success(
            "User registered successfully",
            UserPayload { user: user.into() },
        ),
    ))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginPayload>>, AppError> {
    let (token, user) = auth_service::login(
        &state.db,
        &body.email,
        &body.password,
        body.role,
        &state.config.jwt_secret,
        state.config.jwt_expiry_secs,
    )
    .await?;

    Ok(ApiResponse::success(
        "Login successful",
        LoginPayload {
            token,
            user: user.into(),
        },
    ))
}

/// GET /api/v1/auth/current-user
pub async fn current_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<UserPayload>>, AppError> {
    let user = auth_service::find_user_by_id(&state.db, current_user.id).await?;
    Ok(ApiResponse::success(
        "User fetched successfully",
        UserPayload { user: user.into() },
    ))
}
