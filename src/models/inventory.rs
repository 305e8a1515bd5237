//! Inventory transactions: blood donated to (`in`) or issued by (`out`) an organisation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// The eight ABO/Rh blood groups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "blood_group")]
pub enum BloodGroup {
    #[sqlx(rename = "O+")]
    #[serde(rename = "O+")]
    OPositive,
    #[sqlx(rename = "O-")]
    #[serde(rename = "O-")]
    ONegative,
    #[sqlx(rename = "AB+")]
    #[serde(rename = "AB+")]
    AbPositive,
    #[sqlx(rename = "AB-")]
    #[serde(rename = "AB-")]
    AbNegative,
    #[sqlx(rename = "A+")]
    #[serde(rename = "A+")]
    APositive,
    #[sqlx(rename = "A-")]
    #[serde(rename = "A-")]
    ANegative,
    #[sqlx(rename = "B+")]
    #[serde(rename = "B+")]
    BPositive,
    #[sqlx(rename = "B-")]
    #[serde(rename = "B-")]
    BNegative,
}

impl BloodGroup {
    /// Every group, in the order analytics reports them.
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::OPositive,
        BloodGroup::ONegative,
        BloodGroup::AbPositive,
        BloodGroup::AbNegative,
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
        }
    }
}

impl std::fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of an inventory transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "inventory_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InventoryType {
    In,
    Out,
}

impl InventoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryType::In => "in",
            InventoryType::Out => "out",
        }
    }
}

/// Full inventory row from database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub inventory_type: InventoryType,
    pub blood_group: BloodGroup,
    pub quantity: i32,
    pub email: String,
    #[serde(rename = "organisation")]
    pub organisation_id: Uuid,
    #[serde(rename = "donar")]
    pub donor_id: Option<Uuid>,
    #[serde(rename = "hospital")]
    pub hospital_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inventory row with the display name and email of every party joined in.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub record: InventoryRecord,
    pub organisation_name: Option<String>,
    pub organisation_email: Option<String>,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub hospital_name: Option<String>,
    pub hospital_email: Option<String>,
}

/// Request body for recording a donation or an issue of blood.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventory {
    pub inventory_type: InventoryType,
    pub blood_group: BloodGroup,
    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: i32,
    /// Email of the donor (`in`) or hospital (`out`) taking part.
    #[validate(email(message = "A valid donor or hospital email is required"))]
    pub email: String,
    /// Owning organisation; ignored when the caller is itself an organisation.
    pub organisation: Option<Uuid>,
}

/// Optional filters for inventory searches made by donors and hospitals.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryFilters {
    pub inventory_type: Option<InventoryType>,
    pub blood_group: Option<BloodGroup>,
    pub organisation: Option<Uuid>,
    #[serde(alias = "donar")]
    pub donor: Option<Uuid>,
    pub hospital: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blood_group_order_and_wire_names() {
        let names: Vec<&str> = BloodGroup::ALL.iter().map(BloodGroup::as_str).collect();
        assert_eq!(names, ["O+", "O-", "AB+", "AB-", "A+", "A-", "B+", "B-"]);
        for group in BloodGroup::ALL {
            let json = serde_json::to_string(&group).unwrap();
            assert_eq!(json, format!("\"{}\"", group.as_str()));
        }
    }

    #[test]
    fn unknown_blood_group_rejected() {
        assert!(serde_json::from_str::<BloodGroup>("\"C+\"").is_err());
    }

    #[test]
    fn create_inventory_deserializes_camel_case() {
        let input: CreateInventory = serde_json::from_value(serde_json::json!({
            "inventoryType": "out",
            "bloodGroup": "AB-",
            "quantity": 3,
            "email": "ward@hospital.test"
        }))
        .unwrap();
        assert_eq!(input.inventory_type, InventoryType::Out);
        assert_eq!(input.blood_group, BloodGroup::AbNegative);
        assert!(input.organisation.is_none());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn create_inventory_rejects_negative_quantity() {
        let input = CreateInventory {
            inventory_type: InventoryType::In,
            blood_group: BloodGroup::OPositive,
            quantity: -1,
            email: "donor@test.com".to_string(),
            organisation: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn filters_accept_donar_spelling() {
        let id = Uuid::new_v4();
        let filters: InventoryFilters =
            serde_json::from_value(serde_json::json!({ "donar": id, "inventoryType": "in" }))
                .unwrap();
        assert_eq!(filters.donor, Some(id));
        assert_eq!(filters.inventory_type, Some(InventoryType::In));
    }

    #[test]
    fn record_serializes_party_references() {
        let record = InventoryRecord {
            id: Uuid::nil(),
            inventory_type: InventoryType::In,
            blood_group: BloodGroup::BPositive,
            quantity: 2,
            email: "donor@test.com".to_string(),
            organisation_id: Uuid::nil(),
            donor_id: Some(Uuid::nil()),
            hospital_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["bloodGroup"], "B+");
        assert_eq!(json["inventoryType"], "in");
        assert_eq!(json["donar"], Uuid::nil().to_string());
        assert!(json["hospital"].is_null());
        assert!(json.get("organisation").is_some());
    }
}
