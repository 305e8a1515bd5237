//! Admin service: listing and removing accounts by role.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{UserRole, UserSummary};

/// Users of one role, newest first, with their count.
#[derive(Debug, Serialize)]
pub struct RoleListing {
    pub total: usize,
    pub users: Vec<UserSummary>,
}

/// List every user holding `role`, newest first.
pub async fn list_by_role(pool: &PgPool, role: UserRole) -> Result<RoleListing, AppError> {
    let users = sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT id, role, name, organisation_name, hospital_name, email, phone, address, created_at
        FROM users
        WHERE role = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(role)
    .fetch_all(pool)
    .await?;

    Ok(RoleListing {
        total: users.len(),
        users,
    })
}

/// Delete a user of the given role.
///
/// The role guard keeps one delete endpoint from removing another kind of
/// account. Donations and issues referencing a deleted donor or hospital stay
/// with the reference cleared; a deleted organisation takes its inventory with it.
pub async fn delete_user(pool: &PgPool, role: UserRole, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = $2")
        .bind(id)
        .bind(role)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "No {} account with id {id}",
            role.as_str()
        )));
    }

    tracing::info!(user_id = %id, role = role.as_str(), "User deleted by admin");
    Ok(())
}
