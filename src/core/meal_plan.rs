//! Meal plan business logic - Plan creation, administration, meals, and pricing lookups.
//!
//! Plans are validated before anything is written: a non-empty name, a start strictly before
//! the end, and a positive price. Meals hang off a plan and carry the price that a
//! single-meal payment debits.

use crate::{
    entities::{Meal, MealPlan, meal, meal_plan},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Fields of a plan as supplied by a caller, before it has an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMealPlan {
    /// Plan name
    pub name: String,
    /// Subscription price in credits
    pub price: Decimal,
    /// Start of the validity window
    pub start_date: DateTime<Utc>,
    /// End of the validity window
    pub end_date: DateTime<Utc>,
}

/// Fields of a meal as supplied by a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMeal {
    /// Meal name
    pub name: String,
    /// Ingredient names
    pub ingredients: Vec<String>,
    /// Type tag
    pub meal_type: String,
    /// Single-purchase price in credits
    pub price: Decimal,
}

/// Checks the invariants every stored plan must satisfy.
pub fn validate_meal_plan(plan: &NewMealPlan) -> Result<()> {
    if plan.name.trim().is_empty() {
        return Err(Error::invalid_argument("Meal plan name cannot be empty"));
    }

    if plan.start_date >= plan.end_date {
        return Err(Error::invalid_argument(
            "Meal plan start date must be before end date",
        ));
    }

    if plan.price <= Decimal::ZERO {
        return Err(Error::InvalidAmount { amount: plan.price });
    }

    Ok(())
}

/// Finds a plan by id, returning None if absent.
pub async fn get_meal_plan_by_id<C>(db: &C, plan_id: i64) -> Result<Option<meal_plan::Model>>
where
    C: ConnectionTrait,
{
    MealPlan::find_by_id(plan_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a plan by its exact (trimmed) name.
pub async fn get_meal_plan_by_name<C>(db: &C, name: &str) -> Result<Option<meal_plan::Model>>
where
    C: ConnectionTrait,
{
    MealPlan::find()
        .filter(meal_plan::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the subscription price of a plan.
///
/// # Errors
/// [`Error::MealPlanNotFound`] if the plan does not exist.
pub async fn get_meal_plan_price<C>(db: &C, plan_id: i64) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    get_meal_plan_by_id(db, plan_id)
        .await?
        .map(|plan| plan.price)
        .ok_or(Error::MealPlanNotFound { id: plan_id })
}

/// Validates and stores a new plan.
///
/// Nothing is written if validation fails or a plan with the same name already exists.
#[instrument(skip(db))]
pub async fn create_meal_plan<C>(db: &C, plan: NewMealPlan) -> Result<meal_plan::Model>
where
    C: ConnectionTrait,
{
    validate_meal_plan(&plan)?;

    let name = plan.name.trim().to_string();
    if get_meal_plan_by_name(db, &name).await?.is_some() {
        return Err(Error::invalid_argument(format!(
            "Meal plan '{name}' already exists"
        )));
    }

    let model = meal_plan::ActiveModel {
        name: Set(name),
        price: Set(plan.price),
        start_date: Set(plan.start_date),
        end_date: Set(plan.end_date),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    info!(
        "Created meal plan {} '{}' priced {}",
        created.id, created.name, created.price
    );
    Ok(created)
}

/// Replaces a plan's name, window, and price, applying the same validation as creation.
#[instrument(skip(db))]
pub async fn update_meal_plan<C>(
    db: &C,
    plan_id: i64,
    changes: NewMealPlan,
) -> Result<meal_plan::Model>
where
    C: ConnectionTrait,
{
    validate_meal_plan(&changes)?;

    let mut plan: meal_plan::ActiveModel = get_meal_plan_by_id(db, plan_id)
        .await?
        .ok_or(Error::MealPlanNotFound { id: plan_id })?
        .into();

    plan.name = Set(changes.name.trim().to_string());
    plan.price = Set(changes.price);
    plan.start_date = Set(changes.start_date);
    plan.end_date = Set(changes.end_date);

    plan.update(db).await.map_err(Into::into)
}

/// Adds a meal to an existing plan.
///
/// The price may be zero (an unpriced meal that cannot be bought on its own) but not negative.
#[instrument(skip(db))]
pub async fn add_meal<C>(db: &C, plan_id: i64, new_meal: NewMeal) -> Result<meal::Model>
where
    C: ConnectionTrait,
{
    if new_meal.name.trim().is_empty() {
        return Err(Error::invalid_argument("Meal name cannot be empty"));
    }

    if new_meal.price < Decimal::ZERO {
        return Err(Error::InvalidAmount {
            amount: new_meal.price,
        });
    }

    if get_meal_plan_by_id(db, plan_id).await?.is_none() {
        return Err(Error::MealPlanNotFound { id: plan_id });
    }

    let ingredients = new_meal
        .ingredients
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .collect::<Vec<_>>()
        .join(",");

    let model = meal::ActiveModel {
        meal_plan_id: Set(plan_id),
        name: Set(new_meal.name.trim().to_string()),
        ingredients: Set(ingredients),
        meal_type: Set(new_meal.meal_type),
        price: Set(new_meal.price),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Lists a plan's meals ordered by id.
pub async fn get_meals_for_plan<C>(db: &C, plan_id: i64) -> Result<Vec<meal::Model>>
where
    C: ConnectionTrait,
{
    Meal::find()
        .filter(meal::Column::MealPlanId.eq(plan_id))
        .order_by_asc(meal::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Pricing lookup used by payments: the price of a single meal, or None if the meal is unknown.
pub async fn get_meal_price<C>(db: &C, meal_id: i64) -> Result<Option<Decimal>>
where
    C: ConnectionTrait,
{
    Ok(Meal::find_by_id(meal_id).one(db).await?.map(|m| m.price))
}
