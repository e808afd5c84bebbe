//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod meal;
pub mod meal_plan;
pub mod transaction;
pub mod user;

// Re-export specific types to avoid conflicts
pub use meal::{Column as MealColumn, Entity as Meal, Model as MealModel};
pub use meal_plan::{Column as MealPlanColumn, Entity as MealPlan, Model as MealPlanModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
