//! Subscription service - Attaching users to meal plans.
//!
//! Subscribing checks its preconditions in a fixed order and fails on the first one that does
//! not hold. The debit, the plan reference, and the `subscription` transaction are written in
//! one database transaction. The user row is updated only if it still has no plan and the balance
//! that was checked, otherwise the checks run again against the fresh row.

use crate::{
    core::{meal_plan::get_meal_plan_by_id, transaction::append_transaction, user},
    entities::{transaction, user as user_entity},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{TransactionTrait, prelude::*};
use tracing::{info, instrument, warn};

/// Subscribes a user to a plan using the current time.
///
/// See [`subscribe_at`] for the checks performed.
pub async fn subscribe(
    db: &DatabaseConnection,
    user_id: i64,
    plan_id: i64,
) -> Result<user_entity::Model> {
    subscribe_at(db, user_id, plan_id, Utc::now()).await
}

/// Subscribes a user to a plan as of `now`.
///
/// Checks, in order:
/// 1. the plan exists ([`Error::MealPlanNotFound`])
/// 2. the user exists ([`Error::UserNotFound`])
/// 3. the user has no plan yet ([`Error::AlreadySubscribed`])
/// 4. `now` lies inside the plan window ([`Error::MealPlanNotActive`])
/// 5. the balance covers the price ([`Error::InsufficientCredits`])
///
/// On success the plan price is debited, the plan is set on the user, and a `subscription`
/// transaction is appended. On any failure nothing is written.
///
/// # Returns
/// The updated user.
#[instrument(skip(db))]
pub async fn subscribe_at(
    db: &DatabaseConnection,
    user_id: i64,
    plan_id: i64,
    now: DateTime<Utc>,
) -> Result<user_entity::Model> {
    let plan = get_meal_plan_by_id(db, plan_id)
        .await?
        .ok_or(Error::MealPlanNotFound { id: plan_id })?;
    let mut current = user::get_required_user(db, user_id).await?;

    loop {
        check_can_subscribe(&current, &plan, now)?;

        // The guarded write opens the transaction so concurrent subscribers queue on the write lock
        let txn = db.begin().await?;
        let new_balance = current.credits - plan.price;
        if user::swap_credits_for_subscription(&txn, user_id, plan_id, current.credits, new_balance)
            .await?
        {
            append_transaction(
                &txn,
                user_id,
                plan.price,
                transaction::SUBSCRIPTION,
                plan_id,
                now,
            )
            .await?;

            let updated = user::get_required_user(&txn, user_id).await?;
            txn.commit().await?;

            info!(
                "User {} subscribed to plan {} '{}' for {}, balance now {}",
                user_id, plan.id, plan.name, plan.price, updated.credits
            );
            return Ok(updated);
        }

        txn.rollback().await?;
        warn!(
            "User {} changed while subscribing to plan {}, re-checking",
            user_id, plan_id
        );
        current = user::get_required_user(db, user_id).await?;
    }
}

fn check_can_subscribe(
    user: &user_entity::Model,
    plan: &crate::entities::meal_plan::Model,
    now: DateTime<Utc>,
) -> Result<()> {
    if let Some(current_plan_id) = user.meal_plan_id {
        return Err(Error::AlreadySubscribed {
            user_id: user.id,
            current_plan_id,
        });
    }

    if !plan.is_active_at(now) {
        return Err(Error::MealPlanNotActive { plan_id: plan.id });
    }

    if user.credits < plan.price {
        return Err(Error::InsufficientCredits {
            current: user.credits,
            required: plan.price,
        });
    }

    Ok(())
}

/// Lists the users currently subscribed to a plan, ordered by id.
///
/// # Errors
/// [`Error::MealPlanNotFound`] if the plan does not exist.
pub async fn get_subscribed_users<C>(db: &C, plan_id: i64) -> Result<Vec<user_entity::Model>>
where
    C: ConnectionTrait,
{
    if get_meal_plan_by_id(db, plan_id).await?.is_none() {
        return Err(Error::MealPlanNotFound { id: plan_id });
    }

    user::get_users_by_meal_plan(db, plan_id).await
}
