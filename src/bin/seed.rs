//! Seed script for development — populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env). Every seeded account uses the
//! password below.

use blood_bank::models::inventory::{BloodGroup, CreateInventory, InventoryType};
use blood_bank::models::user::{RegisterUser, User, UserRole};
use blood_bank::services::{auth as auth_service, inventory as inventory_service};
use sqlx::PgPool;

const SEED_PASSWORD: &str = "Test123!";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = blood_bank::db::create_pool(&db_url, 5).await?;

    // Run migrations first
    blood_bank::db::migrate(&pool).await?;

    println!("=== Blood Bank Seed Script ===");

    seed_user(&pool, UserRole::Admin, "Platform Admin", "admin@bloodbank.local").await?;
    let org = seed_user(&pool, UserRole::Organisation, "City Blood Bank", "org@bloodbank.local").await?;
    let donors = [
        seed_user(&pool, UserRole::Donor, "Asha Patel", "asha@donor.local").await?,
        seed_user(&pool, UserRole::Donor, "Ravi Kumar", "ravi@donor.local").await?,
        seed_user(&pool, UserRole::Donor, "Mei Chen", "mei@donor.local").await?,
    ];
    let hospital = seed_user(&pool, UserRole::Hospital, "St. Mary Hospital", "ward@hospital.local").await?;

    seed_inventory(&pool, &org, &donors, &hospital).await?;

    println!("\n=== Seed complete! ===");
    println!("Organisation login: org@bloodbank.local / {SEED_PASSWORD} (role organisation)");

    Ok(())
}

/// Register a user unless one with this email exists already.
async fn seed_user(
    pool: &PgPool,
    role: UserRole,
    full_name: &str,
    email: &str,
) -> anyhow::Result<User> {
    if let Some(existing) = auth_service::find_user_by_email(pool, email).await? {
        println!("[skip] {} <{email}> already exists", existing.display_name());
        return Ok(existing);
    }

    let input = RegisterUser {
        role,
        name: matches!(role, UserRole::Admin | UserRole::Donor).then(|| full_name.to_string()),
        organisation_name: (role == UserRole::Organisation).then(|| full_name.to_string()),
        hospital_name: (role == UserRole::Hospital).then(|| full_name.to_string()),
        email: email.to_string(),
        password: SEED_PASSWORD.to_string(),
        website: None,
        address: "1 Example Road".to_string(),
        phone: "555-0100".to_string(),
    };

    let user = auth_service::register(pool, &input).await?;
    println!("[done] {} {} <{email}>", role.as_str(), user.display_name());
    Ok(user)
}

async fn seed_inventory(
    pool: &PgPool,
    org: &User,
    donors: &[User],
    hospital: &User,
) -> anyhow::Result<()> {
    let existing: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM inventory WHERE organisation_id = $1")
            .bind(org.id)
            .fetch_one(pool)
            .await?;
    if existing > 0 {
        println!("[skip] inventory already seeded ({existing} rows)");
        return Ok(());
    }

    let donations = [
        (0, BloodGroup::OPositive, 4),
        (1, BloodGroup::OPositive, 2),
        (2, BloodGroup::AbNegative, 1),
        (0, BloodGroup::APositive, 3),
        (1, BloodGroup::BNegative, 2),
    ];
    for (donor, blood_group, quantity) in donations {
        let input = CreateInventory {
            inventory_type: InventoryType::In,
            blood_group,
            quantity,
            email: donors[donor].email.clone(),
            organisation: None,
        };
        inventory_service::create(pool, org.id, org.role, &input).await?;
    }

    let issues = [(BloodGroup::OPositive, 3), (BloodGroup::APositive, 1)];
    for (blood_group, quantity) in issues {
        let input = CreateInventory {
            inventory_type: InventoryType::Out,
            blood_group,
            quantity,
            email: hospital.email.clone(),
            organisation: None,
        };
        inventory_service::create(pool, org.id, org.role, &input).await?;
    }

    println!(
        "[done] {} donations and {} issues",
        donations.len(),
        issues.len()
    );
    Ok(())
}
