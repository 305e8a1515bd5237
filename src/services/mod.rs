//! Business logic services.

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod inventory;
