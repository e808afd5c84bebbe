//! Transaction entity - Append-only record of a single credit debit.
//!
//! Each transaction has a `user_id`, a positive amount, a timestamp, a `transaction_type`
//! (`meal_payment` or `subscription`), and the `reference_id` of the meal or plan that was paid
//! for. Rows are never updated or deleted.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Debit for a single meal purchase.
pub const MEAL_PAYMENT: &str = "meal_payment";
/// Debit for a meal plan subscription.
pub const SUBSCRIPTION: &str = "subscription";

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique, strictly increasing identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the user who was debited
    pub user_id: i64,
    /// Debited amount, always positive
    pub amount: Decimal,
    /// When the debit happened
    pub timestamp: DateTimeUtc,
    /// Type of transaction: `"meal_payment"` or `"subscription"`
    pub transaction_type: String,
    /// Meal id for payments, plan id for subscriptions
    pub reference_id: i64,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
