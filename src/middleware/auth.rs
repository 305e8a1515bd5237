//! JWT authentication extractor for Axum handlers.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRole;
use crate::services::auth as auth_service;
use crate::AppState;

/// Authenticated user extracted from JWT Bearer token.
///
/// For organisations the id doubles as the owner reference of their
/// inventory, so analytics and inventory handlers scope queries by it.
/// ```ignore
/// async fn handler(current_user: CurrentUser) -> impl IntoResponse { ... }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: UserRole,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(AppError::auth_failed)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(AppError::auth_failed)?;

        let claims = auth_service::validate_token(token, &state.config.jwt_secret)?;

        let user_id: Uuid = claims.sub.parse().map_err(|_| AppError::auth_failed())?;

        let role: UserRole = claims
            .role
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid role in token: {e}")))?;

        Ok(CurrentUser { id: user_id, role })
    }
}
