//! User model covering all four dashboard roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[sqlx(rename = "donar")]
    #[serde(rename = "donar", alias = "donor")]
    Donor,
    Hospital,
    #[serde(alias = "organization")]
    Organisation,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Donor => "donar",
            UserRole::Hospital => "hospital",
            UserRole::Organisation => "organisation",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "donar" | "donor" => Ok(UserRole::Donor),
            "hospital" => Ok(UserRole::Hospital),
            "organisation" | "organization" => Ok(UserRole::Organisation),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// Full user row from database (includes password_hash — never serialize to API).
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub role: UserRole,
    pub name: Option<String>,
    pub organisation_name: Option<String>,
    pub hospital_name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub website: Option<String>,
    pub address: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The name shown for this user, picked by role.
    pub fn display_name(&self) -> &str {
        let name = match self.role {
            UserRole::Admin | UserRole::Donor => self.name.as_deref(),
            UserRole::Hospital => self.hospital_name.as_deref(),
            UserRole::Organisation => self.organisation_name.as_deref(),
        };
        name.unwrap_or(&self.email)
    }
}

/// User response DTO — excludes password_hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital_name: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub address: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            role: u.role,
            name: u.name,
            organisation_name: u.organisation_name,
            hospital_name: u.hospital_name,
            email: u.email,
            website: u.website,
            address: u.address,
            phone: u.phone,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Registration request. Which name field is required depends on `role`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_role_name"))]
pub struct RegisterUser {
    pub role: UserRole,
    pub name: Option<String>,
    pub organisation_name: Option<String>,
    pub hospital_name: Option<String>,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub website: Option<String>,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
}

fn validate_role_name(input: &RegisterUser) -> Result<(), ValidationError> {
    let (field, message) = match input.role {
        UserRole::Admin | UserRole::Donor => (&input.name, "Name is required"),
        UserRole::Organisation => (&input.organisation_name, "Organisation name is required"),
        UserRole::Hospital => (&input.hospital_name, "Hospital name is required"),
    };
    match field.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(()),
        _ => Err(ValidationError::new("name_required").with_message(message.into())),
    }
}

/// Minimal user summary for joined listings (donors of an organisation, ...).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub role: UserRole,
    pub name: Option<String>,
    pub organisation_name: Option<String>,
    pub hospital_name: Option<String>,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}
