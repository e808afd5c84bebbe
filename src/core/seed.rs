//! Catalog seeding - Inserts configured plans, meals, and users that do not exist yet.

use crate::{
    config::catalog::Catalog,
    core::{meal_plan, user},
    errors::Result,
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, info, instrument};

/// Counts of rows inserted by [`seed_catalog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Plans created
    pub plans_created: usize,
    /// Meals created (only for newly created plans)
    pub meals_created: usize,
    /// Users created
    pub users_created: usize,
}

/// Seeds the database from a catalog.
///
/// Plans are matched by name and users by email; existing entries are left untouched, so running
/// the seed twice creates nothing the second time. Everything is applied in one transaction.
#[instrument(skip(db, catalog))]
pub async fn seed_catalog(db: &DatabaseConnection, catalog: &Catalog) -> Result<SeedSummary> {
    let txn = db.begin().await?;
    let mut summary = SeedSummary::default();

    for plan in &catalog.plans {
        if meal_plan::get_meal_plan_by_name(&txn, &plan.name)
            .await?
            .is_some()
        {
            debug!("Meal plan '{}' already exists, skipping", plan.name);
            continue;
        }

        let created = meal_plan::create_meal_plan(
            &txn,
            meal_plan::NewMealPlan {
                name: plan.name.clone(),
                price: plan.price,
                start_date: plan.start_date,
                end_date: plan.end_date,
            },
        )
        .await?;
        summary.plans_created += 1;

        for meal in &plan.meals {
            meal_plan::add_meal(
                &txn,
                created.id,
                meal_plan::NewMeal {
                    name: meal.name.clone(),
                    ingredients: meal.ingredients.clone(),
                    meal_type: meal.meal_type.clone(),
                    price: meal.price,
                },
            )
            .await?;
            summary.meals_created += 1;
        }
    }

    for entry in &catalog.users {
        if user::get_user_by_email(&txn, &entry.email).await?.is_some() {
            debug!("User '{}' already exists, skipping", entry.email);
            continue;
        }

        user::create_user(&txn, &entry.name, &entry.email, entry.credits).await?;
        summary.users_created += 1;
    }

    txn.commit().await?;
    info!(
        "Seeded {} plans, {} meals, {} users",
        summary.plans_created, summary.meals_created, summary.users_created
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::catalog::parse_catalog;
    use crate::errors::Error;
    use crate::test_utils::*;

    const CATALOG: &str = r#"
        [[plans]]
        name = "Student Plan - Weekly"
        price = 35.0
        start_date = "2024-11-18T00:00:00Z"
        end_date = "2024-11-22T23:59:59Z"

        [[plans.meals]]
        name = "Lasagna"
        ingredients = ["pasta", "beef", "tomato"]
        meal_type = "lunch"
        price = 8.5

        [[plans.meals]]
        name = "Oatmeal"
        ingredients = ["oats", "milk"]
        meal_type = "breakfast"
        price = 3.0

        [[users]]
        name = "John Doe"
        email = "john.doe@test.ch"
        credits = 50.0

        [[users]]
        name = "Jane Smith"
        email = "jane.smith@test.ch"
        credits = 10.0
    "#;

    #[tokio::test]
    async fn test_seed_catalog_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let catalog = parse_catalog(CATALOG)?;

        let first = seed_catalog(&db, &catalog).await?;
        assert_eq!(
            first,
            SeedSummary {
                plans_created: 1,
                meals_created: 2,
                users_created: 2,
            }
        );

        let second = seed_catalog(&db, &catalog).await?;
        assert_eq!(second, SeedSummary::default());

        let plan = meal_plan::get_meal_plan_by_name(&db, "Student Plan - Weekly")
            .await?
            .unwrap();
        let meals = meal_plan::get_meals_for_plan(&db, plan.id).await?;
        assert_eq!(meals.len(), 2);
        assert_eq!(meals[0].ingredient_list(), vec!["pasta", "beef", "tomato"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_catalog_rolls_back_on_invalid_entry() -> Result<()> {
        let db = setup_test_db().await?;
        let catalog = parse_catalog(
            r#"
            [[users]]
            name = "Valid User"
            email = "valid@example.com"
            credits = 5.0

            [[users]]
            name = "Broken User"
            email = "broken@example.com"
            credits = -5.0
        "#,
        )?;

        let result = seed_catalog(&db, &catalog).await;
        assert!(matches!(result, Err(Error::InvalidAmount { amount: _ })));
        assert!(
            user::get_user_by_email(&db, "valid@example.com")
                .await?
                .is_none()
        );

        Ok(())
    }
}
