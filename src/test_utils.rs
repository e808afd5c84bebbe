//! Shared test utilities for the meal credit ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{meal_plan, transaction, user},
    entities,
    errors::Result,
};
use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a file-backed `SQLite` database in a fresh temporary directory.
///
/// Unlike the in-memory setup, the connection pool holds several connections to the same
/// database, so concurrently spawned operations really interleave. Keep the returned
/// [`TempDir`] alive for as long as the connection is used.
pub async fn setup_file_test_db() -> Result<(TempDir, DatabaseConnection)> {
    let dir = tempfile::tempdir()?;
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("ledger.sqlite").display());
    let db = sea_orm::Database::connect(&url).await?;
    crate::config::database::create_tables(&db).await?;
    Ok((dir, db))
}

/// Creates a test user with the given balance.
///
/// The email is derived from the name (`"Alice Smith"` becomes `alice.smith@example.com`),
/// so names must be unique within a test.
pub async fn create_test_user(
    db: &DatabaseConnection,
    name: &str,
    credits: Decimal,
) -> Result<entities::user::Model> {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    user::create_user(db, name, &email, credits).await
}

/// Creates a plan whose window spans from yesterday to tomorrow, so it is active now.
pub async fn create_active_plan(
    db: &DatabaseConnection,
    name: &str,
    price: Decimal,
) -> Result<entities::meal_plan::Model> {
    let now = Utc::now();
    meal_plan::create_meal_plan(
        db,
        meal_plan::NewMealPlan {
            name: name.to_string(),
            price,
            start_date: now - Duration::days(1),
            end_date: now + Duration::days(1),
        },
    )
    .await
}

/// Creates a plan with an explicit validity window.
pub async fn create_custom_plan(
    db: &DatabaseConnection,
    name: &str,
    price: Decimal,
    start_date: chrono::DateTime<Utc>,
    end_date: chrono::DateTime<Utc>,
) -> Result<entities::meal_plan::Model> {
    meal_plan::create_meal_plan(
        db,
        meal_plan::NewMealPlan {
            name: name.to_string(),
            price,
            start_date,
            end_date,
        },
    )
    .await
}

/// Adds a lunch meal with the given price to a plan.
pub async fn create_test_meal(
    db: &DatabaseConnection,
    plan_id: i64,
    name: &str,
    price: Decimal,
) -> Result<entities::meal::Model> {
    meal_plan::add_meal(
        db,
        plan_id,
        meal_plan::NewMeal {
            name: name.to_string(),
            ingredients: vec!["rice".to_string(), "vegetables".to_string()],
            meal_type: "lunch".to_string(),
            price,
        },
    )
    .await
}

/// Seeds three users and ten meal payments dated 2024-10-01 through 2024-10-10.
///
/// Users are returned in order Alice, Bob, Charlie. The payments rotate between them, so
/// Alice owns the ones dated 10/01, 10/04, 10/07, and 10/10; Bob and Charlie own three each.
pub async fn seed_history_fixture(
    db: &DatabaseConnection,
) -> Result<Vec<entities::user::Model>> {
    let users = vec![
        create_test_user(db, "Alice Smith", Decimal::ZERO).await?,
        create_test_user(db, "Bob Johnson", Decimal::ZERO).await?,
        create_test_user(db, "Charlie Brown", Decimal::ZERO).await?,
    ];

    let amounts = [
        dec!(50),
        dec!(30),
        dec!(75),
        dec!(100),
        dec!(40),
        dec!(60),
        dec!(20),
        dec!(90),
        dec!(10),
        dec!(25),
    ];
    for (day, (owner, amount)) in (1_u32..).zip(users.iter().cycle().zip(amounts)) {
        let timestamp = Utc
            .with_ymd_and_hms(2024, 10, day, 12, 0, 0)
            .single()
            .ok_or_else(|| crate::errors::Error::invalid_argument("invalid fixture date"))?;
        transaction::append_transaction(
            db,
            owner.id,
            amount,
            entities::transaction::MEAL_PAYMENT,
            1,
            timestamp,
        )
        .await?;
    }

    Ok(users)
}
