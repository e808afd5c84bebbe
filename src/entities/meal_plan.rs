//! Meal plan entity - A named, time-bounded bundle of meals sold for a fixed price.
//!
//! A plan can only be subscribed to while the current time lies inside
//! `[start_date, end_date]`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Meal plan database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meal_plans")]
pub struct Model {
    /// Unique identifier for the plan
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Plan name (e.g., "Student Plan - Weekly")
    #[sea_orm(unique)]
    pub name: String,
    /// Subscription price in credits, always positive
    pub price: Decimal,
    /// First instant at which the plan can be subscribed to
    pub start_date: DateTimeUtc,
    /// Last instant at which the plan can be subscribed to
    pub end_date: DateTimeUtc,
}

impl Model {
    /// Whether `now` falls inside the plan's validity window, both ends included.
    #[must_use]
    pub fn is_active_at(&self, now: DateTimeUtc) -> bool {
        self.start_date <= now && now <= self.end_date
    }
}

/// Defines relationships between `MealPlan` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One plan offers many meals
    #[sea_orm(has_many = "super::meal::Entity")]
    Meals,
    /// One plan has many subscribed users
    #[sea_orm(has_many = "super::user::Entity")]
    Users,
}

impl Related<super::meal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meals.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
