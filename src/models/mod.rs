//! Database models and DTOs for all domain entities.

pub mod inventory;
pub mod user;
