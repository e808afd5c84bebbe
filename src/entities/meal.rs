//! Meal entity - Reference data for a single purchasable meal.
//!
//! Meals belong to a plan and carry their own price, which is what a single-meal payment
//! debits. Ingredients are stored as one comma-separated column.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Meal database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meals")]
pub struct Model {
    /// Unique identifier for the meal
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Plan offering this meal
    pub meal_plan_id: i64,
    /// Meal name (e.g., "Lasagna")
    pub name: String,
    /// Comma-separated ingredient list
    pub ingredients: String,
    /// Free-form type tag: `"breakfast"`, `"lunch"`, `"vegetarian"`, ...
    pub meal_type: String,
    /// Price of a single purchase in credits; zero means the meal is not priced
    pub price: Decimal,
}

impl Model {
    /// Ingredients split out of the stored column, whitespace trimmed.
    #[must_use]
    pub fn ingredient_list(&self) -> Vec<&str> {
        self.ingredients
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Defines relationships between Meal and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each meal belongs to one plan
    #[sea_orm(
        belongs_to = "super::meal_plan::Entity",
        from = "Column::MealPlanId",
        to = "super::meal_plan::Column::Id"
    )]
    MealPlan,
}

impl Related<super::meal_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MealPlan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
