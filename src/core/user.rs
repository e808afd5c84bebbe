//! User business logic - Lookups, credit top-ups, and the guarded balance updates.
//!
//! Balances are `Decimal` and all arithmetic on them happens in Rust. A balance is written with
//! a compare-and-set `UPDATE users SET credits = new WHERE id = ? AND credits = expected`, so a
//! write computed from a stale read affects no rows instead of overwriting a concurrent change.

use crate::{
    entities::{User, user},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::Expr};
use tracing::{debug, info, instrument};

/// Finds a user by id, returning None if absent.
pub async fn get_user_by_id<C>(db: &C, user_id: i64) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds a user by id, failing with [`Error::UserNotFound`] if absent.
pub async fn get_required_user<C>(db: &C, user_id: i64) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    get_user_by_id(db, user_id)
        .await?
        .ok_or(Error::UserNotFound { id: user_id })
}

/// Finds a user by email address.
pub async fn get_user_by_email<C>(db: &C, email: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a user with a starting balance and no meal plan.
///
/// Name and email are trimmed and must not be empty; the starting balance must be
/// non-negative.
#[instrument(skip(db))]
pub async fn create_user<C>(
    db: &C,
    name: &str,
    email: &str,
    credits: Decimal,
) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    if name.trim().is_empty() {
        return Err(Error::invalid_argument("User name cannot be empty"));
    }
    if email.trim().is_empty() {
        return Err(Error::invalid_argument("User email cannot be empty"));
    }
    if credits < Decimal::ZERO {
        return Err(Error::InvalidAmount { amount: credits });
    }

    let user = user::ActiveModel {
        name: Set(name.trim().to_string()),
        email: Set(email.trim().to_string()),
        credits: Set(credits),
        meal_plan_id: Set(None),
        ..Default::default()
    };

    let created = user.insert(db).await?;
    info!("Created user {} with {} credits", created.id, created.credits);
    Ok(created)
}

/// Returns every user currently referencing `plan_id`, ordered by id.
pub async fn get_users_by_meal_plan<C>(db: &C, plan_id: i64) -> Result<Vec<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::MealPlanId.eq(plan_id))
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Adds credits to a user's balance and returns the updated user.
///
/// No transaction is recorded: the transaction log only tracks debits.
#[instrument(skip(db))]
pub async fn add_credits<C>(db: &C, user_id: i64, amount: Decimal) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount { amount });
    }

    loop {
        let current = get_required_user(db, user_id).await?;
        if swap_credits(db, user_id, current.credits, current.credits + amount).await? {
            break;
        }
    }

    let updated = get_required_user(db, user_id).await?;
    info!(
        "Added {} credits to user {}, balance now {}",
        amount, user_id, updated.credits
    );
    Ok(updated)
}

/// Sets the balance to `new_balance` if and only if it still equals `expected`.
///
/// Returns `false` when no row was updated (unknown user or balance changed since it was read).
pub(crate) async fn swap_credits<C>(
    db: &C,
    user_id: i64,
    expected: Decimal,
    new_balance: Decimal,
) -> Result<bool>
where
    C: ConnectionTrait,
{
    let result = User::update_many()
        .col_expr(user::Column::Credits, Expr::value(new_balance))
        .filter(user::Column::Id.eq(user_id))
        .filter(user::Column::Credits.eq(expected))
        .exec(db)
        .await?;

    debug!(
        "Balance swap {} -> {} for user {} affected {} row(s)",
        expected, new_balance, user_id, result.rows_affected
    );
    Ok(result.rows_affected == 1)
}

/// Like [`swap_credits`], but also sets the plan reference and only applies while the user has
/// no plan.
pub(crate) async fn swap_credits_for_subscription<C>(
    db: &C,
    user_id: i64,
    plan_id: i64,
    expected: Decimal,
    new_balance: Decimal,
) -> Result<bool>
where
    C: ConnectionTrait,
{
    let result = User::update_many()
        .col_expr(user::Column::Credits, Expr::value(new_balance))
        .col_expr(user::Column::MealPlanId, Expr::value(plan_id))
        .filter(user::Column::Id.eq(user_id))
        .filter(user::Column::MealPlanId.is_null())
        .filter(user::Column::Credits.eq(expected))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}
