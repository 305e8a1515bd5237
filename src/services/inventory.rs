//! Inventory service: recording donations and issues, and listing them.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::inventory::{
    BloodGroup, CreateInventory, InventoryDetail, InventoryFilters, InventoryRecord, InventoryType,
};
use crate::models::user::{UserRole, UserSummary};
use crate::services::{analytics, auth as auth_service};

/// Number of rows returned by [`recent_for_organisation`] and [`recent_filtered`].
pub const RECENT_INVENTORY_LIMIT: i64 = 3;

/// Inventory rows with the display name and email of each party joined in.
const DETAIL_SELECT: &str = r#"
    SELECT
        i.*,
        COALESCE(o.organisation_name, o.email) AS organisation_name,
        o.email AS organisation_email,
        d.name AS donor_name,
        d.email AS donor_email,
        h.hospital_name AS hospital_name,
        h.email AS hospital_email
    FROM inventory i
    LEFT JOIN users o ON o.id = i.organisation_id
    LEFT JOIN users d ON d.id = i.donor_id
    LEFT JOIN users h ON h.id = i.hospital_id
"#;

/// Which users to list relative to a given user, via shared inventory rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counterparts {
    /// Donors who gave to an organisation.
    DonorsOf,
    /// Hospitals an organisation issued blood to.
    HospitalsOf,
    /// Organisations a donor gave to.
    OrganisationsOfDonor,
    /// Organisations a hospital received blood from.
    OrganisationsOfHospital,
}

impl Counterparts {
    /// `(column holding the listed users, column matched against the given user)`.
    fn columns(self) -> (&'static str, &'static str) {
        match self {
            Counterparts::DonorsOf => ("donor_id", "organisation_id"),
            Counterparts::HospitalsOf => ("hospital_id", "organisation_id"),
            Counterparts::OrganisationsOfDonor => ("organisation_id", "donor_id"),
            Counterparts::OrganisationsOfHospital => ("organisation_id", "hospital_id"),
        }
    }
}

impl InventoryFilters {
    /// Whether the filters pin the results to rows the given user takes part in.
    pub fn involves(&self, user_id: Uuid) -> bool {
        [self.organisation, self.donor, self.hospital]
            .iter()
            .any(|id| *id == Some(user_id))
    }
}

/// Check that the party named by email has the role the direction needs.
pub fn check_party_role(inventory_type: InventoryType, role: UserRole) -> Result<(), AppError> {
    match (inventory_type, role) {
        (InventoryType::In, UserRole::Donor) | (InventoryType::Out, UserRole::Hospital) => Ok(()),
        (InventoryType::In, _) => Err(AppError::Validation("Not a donor account".to_string())),
        (InventoryType::Out, _) => Err(AppError::Validation("Not a hospital".to_string())),
    }
}

/// Check that an issue of `requested` units fits what the organisation holds.
pub fn check_stock(blood_group: BloodGroup, requested: i32, available: i64) -> Result<(), AppError> {
    if i64::from(requested) > available {
        return Err(AppError::Validation(format!(
            "Only {} units of {blood_group} are available",
            available.max(0)
        )));
    }
    Ok(())
}

/// Work out which organisation owns a new row.
///
/// Organisations record into their own inventory; anyone else must name an
/// organisation account explicitly.
async fn owning_organisation(
    pool: &PgPool,
    caller_id: Uuid,
    caller_role: UserRole,
    requested: Option<Uuid>,
) -> Result<Uuid, AppError> {
    if caller_role == UserRole::Organisation {
        return Ok(caller_id);
    }

    let id = requested
        .ok_or_else(|| AppError::Validation("Organisation is required".to_string()))?;
    let organisation = auth_service::find_user_by_id(pool, id).await?;
    if organisation.role != UserRole::Organisation {
        return Err(AppError::Validation(
            "Organisation must reference an organisation account".to_string(),
        ));
    }
    Ok(organisation.id)
}

/// Record a donation (`in`) or an issue (`out`).
///
/// Issues are checked against current availability first; the check and the
/// insert are separate statements.
pub async fn create(
    pool: &PgPool,
    caller_id: Uuid,
    caller_role: UserRole,
    input: &CreateInventory,
) -> Result<InventoryRecord, AppError> {
    input.validate()?;

    let organisation_id = owning_organisation(pool, caller_id, caller_role, input.organisation).await?;

    let party = auth_service::find_user_by_email(pool, &input.email)
        .await?
        .ok_or_else(|| AppError::NotFound("No user found with this email".to_string()))?;
    check_party_role(input.inventory_type, party.role)?;

    let (donor_id, hospital_id) = match input.inventory_type {
        InventoryType::In => (Some(party.id), None),
        InventoryType::Out => {
            let available = analytics::available(pool, organisation_id, input.blood_group).await?;
            check_stock(input.blood_group, input.quantity, available)?;
            (None, Some(party.id))
        }
    };

    let record = sqlx::query_as::<_, InventoryRecord>(
        r#"
        INSERT INTO inventory
            (inventory_type, blood_group, quantity, email, organisation_id, donor_id, hospital_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(input.inventory_type)
    .bind(input.blood_group)
    .bind(input.quantity)
    .bind(&input.email)
    .bind(organisation_id)
    .bind(donor_id)
    .bind(hospital_id)
    .fetch_one(pool)
    .await?;

    tracing::info!(
        inventory_id = %record.id,
        organisation_id = %organisation_id,
        inventory_type = record.inventory_type.as_str(),
        blood_group = record.blood_group.as_str(),
        quantity = record.quantity,
        "Inventory recorded"
    );
    Ok(record)
}

/// All rows owned by an organisation, newest first.
pub async fn list_for_organisation(
    pool: &PgPool,
    organisation_id: Uuid,
) -> Result<Vec<InventoryDetail>, AppError> {
    let sql = format!("{DETAIL_SELECT} WHERE i.organisation_id = $1 ORDER BY i.created_at DESC");
    let rows = sqlx::query_as::<_, InventoryDetail>(&sql)
        .bind(organisation_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// The newest few rows owned by an organisation.
pub async fn recent_for_organisation(
    pool: &PgPool,
    organisation_id: Uuid,
) -> Result<Vec<InventoryDetail>, AppError> {
    let sql = format!(
        "{DETAIL_SELECT} WHERE i.organisation_id = $1 ORDER BY i.created_at DESC LIMIT {RECENT_INVENTORY_LIMIT}"
    );
    let rows = sqlx::query_as::<_, InventoryDetail>(&sql)
        .bind(organisation_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Rows matching every given filter, newest first.
pub async fn list_filtered(
    pool: &PgPool,
    filters: &InventoryFilters,
) -> Result<Vec<InventoryDetail>, AppError> {
    fetch_filtered(pool, filters, None).await
}

/// The newest few rows matching every given filter.
pub async fn recent_filtered(
    pool: &PgPool,
    filters: &InventoryFilters,
) -> Result<Vec<InventoryDetail>, AppError> {
    fetch_filtered(pool, filters, Some(RECENT_INVENTORY_LIMIT)).await
}

/// Build the filtered query; placeholders are numbered in field order.
fn filtered_sql(filters: &InventoryFilters, limit: Option<i64>) -> String {
    let mut conditions: Vec<String> = Vec::new();
    let mut param_index = 0u32;

    if filters.inventory_type.is_some() {
        param_index += 1;
        conditions.push(format!("i.inventory_type = ${param_index}"));
    }
    if filters.blood_group.is_some() {
        param_index += 1;
        conditions.push(format!("i.blood_group = ${param_index}"));
    }
    if filters.organisation.is_some() {
        param_index += 1;
        conditions.push(format!("i.organisation_id = ${param_index}"));
    }
    if filters.donor.is_some() {
        param_index += 1;
        conditions.push(format!("i.donor_id = ${param_index}"));
    }
    if filters.hospital.is_some() {
        param_index += 1;
        conditions.push(format!("i.hospital_id = ${param_index}"));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    let limit_clause = limit.map(|n| format!(" LIMIT {n}")).unwrap_or_default();

    format!("{DETAIL_SELECT} {where_clause} ORDER BY i.created_at DESC{limit_clause}")
}

async fn fetch_filtered(
    pool: &PgPool,
    filters: &InventoryFilters,
    limit: Option<i64>,
) -> Result<Vec<InventoryDetail>, AppError> {
    let sql = filtered_sql(filters, limit);
    let mut query = sqlx::query_as::<_, InventoryDetail>(&sql);

    // Bind in the same order the placeholders were numbered.
    if let Some(inventory_type) = filters.inventory_type {
        query = query.bind(inventory_type);
    }
    if let Some(blood_group) = filters.blood_group {
        query = query.bind(blood_group);
    }
    if let Some(organisation) = filters.organisation {
        query = query.bind(organisation);
    }
    if let Some(donor) = filters.donor {
        query = query.bind(donor);
    }
    if let Some(hospital) = filters.hospital {
        query = query.bind(hospital);
    }

    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

/// Distinct users on the other side of a user's inventory rows.
pub async fn counterparts(
    pool: &PgPool,
    relation: Counterparts,
    user_id: Uuid,
) -> Result<Vec<UserSummary>, AppError> {
    let (listed, matched) = relation.columns();
    let sql = format!(
        r#"
        SELECT id, role, name, organisation_name, hospital_name, email, phone, address, created_at
        FROM users
        WHERE id IN (
            SELECT {listed} FROM inventory WHERE {matched} = $1 AND {listed} IS NOT NULL
        )
        ORDER BY created_at DESC
        "#
    );
    let rows = sqlx::query_as::<_, UserSummary>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn donations_need_a_donor() {
        assert!(check_party_role(InventoryType::In, UserRole::Donor).is_ok());
        let err = check_party_role(InventoryType::In, UserRole::Hospital).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Not a donor account");
    }

    #[test]
    fn issues_need_a_hospital() {
        assert!(check_party_role(InventoryType::Out, UserRole::Hospital).is_ok());
        let err = check_party_role(InventoryType::Out, UserRole::Donor).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Not a hospital");
        assert!(check_party_role(InventoryType::Out, UserRole::Organisation).is_err());
    }

    #[test]
    fn stock_check_allows_exact_amount() {
        assert!(check_stock(BloodGroup::APositive, 4, 4).is_ok());
        assert!(check_stock(BloodGroup::APositive, 0, 0).is_ok());
    }

    #[test]
    fn stock_check_rejects_excess() {
        let err = check_stock(BloodGroup::ANegative, 5, 4).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Only 4 units of A- are available");
    }

    #[test]
    fn stock_check_reports_zero_when_overdrawn() {
        let err = check_stock(BloodGroup::BPositive, 1, -3).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Only 0 units of B+ are available");
    }

    #[test]
    fn filters_involve_caller() {
        let me = Uuid::new_v4();
        let filters = InventoryFilters {
            inventory_type: Some(InventoryType::Out),
            hospital: Some(me),
            ..Default::default()
        };
        assert!(filters.involves(me));
        assert!(!filters.involves(Uuid::new_v4()));
        assert!(!InventoryFilters::default().involves(me));
    }

    #[test]
    fn filtered_sql_numbers_placeholders_in_field_order() {
        let filters = InventoryFilters {
            inventory_type: Some(InventoryType::In),
            donor: Some(Uuid::new_v4()),
            ..Default::default()
        };
        let sql = filtered_sql(&filters, None);
        assert!(sql.contains("WHERE i.inventory_type = $1 AND i.donor_id = $2"));
        assert!(sql.trim_end().ends_with("ORDER BY i.created_at DESC"));
    }

    #[test]
    fn recent_filtered_sql_is_limited() {
        let filters = InventoryFilters {
            donor: Some(Uuid::new_v4()),
            ..Default::default()
        };
        let sql = filtered_sql(&filters, Some(RECENT_INVENTORY_LIMIT));
        assert!(sql.contains("WHERE i.donor_id = $1"));
        assert!(sql.ends_with("ORDER BY i.created_at DESC LIMIT 3"));
    }

    #[test]
    fn counterpart_columns() {
        assert_eq!(Counterparts::DonorsOf.columns(), ("donor_id", "organisation_id"));
        assert_eq!(
            Counterparts::OrganisationsOfHospital.columns(),
            ("organisation_id", "hospital_id")
        );
    }
}
