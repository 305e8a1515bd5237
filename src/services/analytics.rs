//! Inventory analytics: per-blood-group availability and organisation totals.
//!
//! Everything here is a read-only projection over `inventory`, recomputed on
//! every call. Available blood is `in - out` and is not clamped at zero.

use serde::Serialize;
use sqlx::PgPool;
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::inventory::{BloodGroup, InventoryRecord, InventoryType};

/// Number of transactions reported in [`OrganisationStats::recent_transactions`].
pub const RECENT_TRANSACTIONS_LIMIT: i64 = 5;

/// Donated, issued and remaining units for one blood group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodGroupData {
    pub blood_group: BloodGroup,
    pub total_in: i64,
    pub total_out: i64,
    // Field name kept as the dashboard reads it.
    #[serde(rename = "availabeBlood")]
    pub available_blood: i64,
}

impl BloodGroupData {
    pub fn new(blood_group: BloodGroup, total_in: i64, total_out: i64) -> Self {
        Self {
            blood_group,
            total_in,
            total_out,
            available_blood: total_in - total_out,
        }
    }

    /// A group with no transactions at all.
    pub fn empty(blood_group: BloodGroup) -> Self {
        Self::new(blood_group, 0, 0)
    }
}

/// Organisation-wide totals for the dashboard overview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationStats {
    pub total_donations: i64,
    pub total_used: i64,
    pub total_available: i64,
    pub total_donors: i64,
    pub total_hospitals: i64,
    pub recent_transactions: Vec<InventoryRecord>,
}

impl OrganisationStats {
    pub fn new(
        total_donations: i64,
        total_used: i64,
        total_donors: i64,
        total_hospitals: i64,
        recent_transactions: Vec<InventoryRecord>,
    ) -> Self {
        Self {
            total_donations,
            total_used,
            total_available: total_donations - total_used,
            total_donors,
            total_hospitals,
            recent_transactions,
        }
    }
}

/// Put per-group results into [`BloodGroup::ALL`] order, one entry per group.
///
/// Results arrive in completion order; a group with no result reports zeros.
pub fn in_group_order(results: impl IntoIterator<Item = BloodGroupData>) -> Vec<BloodGroupData> {
    let mut slots: [Option<BloodGroupData>; 8] = Default::default();
    for data in results {
        if let Some(index) = BloodGroup::ALL.iter().position(|g| *g == data.blood_group) {
            slots[index] = Some(data);
        }
    }

    BloodGroup::ALL
        .iter()
        .zip(slots)
        .map(|(group, slot)| slot.unwrap_or_else(|| BloodGroupData::empty(*group)))
        .collect()
}

/// Per-blood-group totals for an organisation.
///
/// Each group runs on its own task with its `in` and `out` sums issued
/// concurrently. The first failure aborts the remaining tasks.
pub async fn blood_group_breakdown(
    pool: &PgPool,
    organisation: Uuid,
) -> Result<Vec<BloodGroupData>, AppError> {
    let mut tasks = JoinSet::new();
    for group in BloodGroup::ALL {
        let pool = pool.clone();
        tasks.spawn(async move { group_totals(&pool, organisation, group).await });
    }

    let mut results = Vec::with_capacity(BloodGroup::ALL.len());
    while let Some(joined) = tasks.join_next().await {
        let data = joined
            .map_err(|e| AppError::Internal(format!("Blood group aggregation task failed: {e}")))??;
        results.push(data);
    }

    Ok(in_group_order(results))
}

/// Units currently available for one group: total donated minus total issued.
pub async fn available(
    pool: &PgPool,
    organisation: Uuid,
    blood_group: BloodGroup,
) -> Result<i64, AppError> {
    Ok(group_totals(pool, organisation, blood_group)
        .await?
        .available_blood)
}

/// Fetch all organisation statistics in parallel queries.
pub async fn organisation_stats(
    pool: &PgPool,
    organisation: Uuid,
) -> Result<OrganisationStats, AppError> {
    let (total_donations, total_used, total_donors, total_hospitals, recent_transactions) = tokio::try_join!(
        sum_quantity(pool, organisation, InventoryType::In, None),
        sum_quantity(pool, organisation, InventoryType::Out, None),
        count_distinct_donors(pool, organisation),
        count_distinct_hospitals(pool, organisation),
        fetch_recent_transactions(pool, organisation),
    )?;

    Ok(OrganisationStats::new(
        total_donations,
        total_used,
        total_donors,
        total_hospitals,
        recent_transactions,
    ))
}

async fn group_totals(
    pool: &PgPool,
    organisation: Uuid,
    blood_group: BloodGroup,
) -> Result<BloodGroupData, AppError> {
    let (total_in, total_out) = tokio::try_join!(
        sum_quantity(pool, organisation, InventoryType::In, Some(blood_group)),
        sum_quantity(pool, organisation, InventoryType::Out, Some(blood_group)),
    )?;
    Ok(BloodGroupData::new(blood_group, total_in, total_out))
}

/// Sum of quantities of one direction, optionally restricted to a blood group.
async fn sum_quantity(
    pool: &PgPool,
    organisation: Uuid,
    inventory_type: InventoryType,
    blood_group: Option<BloodGroup>,
) -> Result<i64, AppError> {
    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(quantity), 0)::BIGINT
        FROM inventory
        WHERE organisation_id = $1
          AND inventory_type = $2
          AND ($3::blood_group IS NULL OR blood_group = $3)
        "#,
    )
    .bind(organisation)
    .bind(inventory_type)
    .bind(blood_group)
    .fetch_one(pool)
    .await?;
    Ok(total)
}

/// Count distinct donors among the organisation's donations.
async fn count_distinct_donors(pool: &PgPool, organisation: Uuid) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(DISTINCT donor_id) FROM inventory WHERE organisation_id = $1 AND inventory_type = 'in'",
    )
    .bind(organisation)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Count distinct hospitals among the organisation's issues.
async fn count_distinct_hospitals(pool: &PgPool, organisation: Uuid) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(DISTINCT hospital_id) FROM inventory WHERE organisation_id = $1 AND inventory_type = 'out'",
    )
    .bind(organisation)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Fetch the most recent transactions of any type.
async fn fetch_recent_transactions(
    pool: &PgPool,
    organisation: Uuid,
) -> Result<Vec<InventoryRecord>, AppError> {
    let rows = sqlx::query_as::<_, InventoryRecord>(
        r#"
        SELECT * FROM inventory
        WHERE organisation_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(organisation)
    .bind(RECENT_TRANSACTIONS_LIMIT)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_is_in_minus_out() {
        let data = BloodGroupData::new(BloodGroup::OPositive, 5, 1);
        assert_eq!(data.available_blood, 4);
    }

    #[test]
    fn available_may_go_negative() {
        let data = BloodGroupData::new(BloodGroup::AbNegative, 2, 7);
        assert_eq!(data.available_blood, -5);
    }

    #[test]
    fn no_results_gives_eight_zero_groups() {
        let breakdown = in_group_order(Vec::new());
        assert_eq!(breakdown.len(), 8);
        for (data, group) in breakdown.iter().zip(BloodGroup::ALL) {
            assert_eq!(data.blood_group, group);
            assert_eq!((data.total_in, data.total_out, data.available_blood), (0, 0, 0));
        }
    }

    #[test]
    fn results_are_reordered_by_group() {
        let shuffled = vec![
            BloodGroupData::new(BloodGroup::BNegative, 1, 0),
            BloodGroupData::new(BloodGroup::OPositive, 5, 1),
            BloodGroupData::new(BloodGroup::APositive, 3, 3),
        ];
        let breakdown = in_group_order(shuffled);
        let order: Vec<BloodGroup> = breakdown.iter().map(|d| d.blood_group).collect();
        assert_eq!(order, BloodGroup::ALL.to_vec());
        assert_eq!(breakdown[0], BloodGroupData::new(BloodGroup::OPositive, 5, 1));
        assert_eq!(breakdown[4], BloodGroupData::new(BloodGroup::APositive, 3, 3));
        assert_eq!(breakdown[7], BloodGroupData::new(BloodGroup::BNegative, 1, 0));
        assert_eq!(breakdown[1], BloodGroupData::empty(BloodGroup::ONegative));
    }

    #[test]
    fn blood_group_data_wire_format() {
        let json = serde_json::to_value(BloodGroupData::new(BloodGroup::OPositive, 5, 1)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "bloodGroup": "O+",
                "totalIn": 5,
                "totalOut": 1,
                "availabeBlood": 4
            })
        );
    }

    #[test]
    fn stats_available_is_donations_minus_used() {
        let stats = OrganisationStats::new(10, 14, 2, 1, Vec::new());
        assert_eq!(stats.total_available, -4);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalDonations"], 10);
        assert_eq!(json["totalUsed"], 14);
        assert_eq!(json["totalAvailable"], -4);
        assert_eq!(json["totalDonors"], 2);
        assert_eq!(json["totalHospitals"], 1);
        assert!(json["recentTransactions"].as_array().unwrap().is_empty());
    }
}
