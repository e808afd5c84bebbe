//! Payment service - Paying for a single meal out of a user's credits.

use crate::{
    core::{meal_plan::get_meal_price, transaction::append_transaction, user},
    entities::transaction,
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

/// Charges a user for one meal using the current time.
///
/// See [`process_payment_at`].
pub async fn process_payment(db: &DatabaseConnection, user_id: i64, meal_id: i64) -> Result<bool> {
    process_payment_at(db, user_id, meal_id, Utc::now()).await
}

/// Charges a user for one meal as of `now`.
///
/// Each successful call debits the meal price and appends one `meal_payment` transaction;
/// repeating the call charges again. Concurrent payments by the same user are applied one after
/// another against the latest balance.
///
/// # Returns
/// * `Ok(true)` - The price was debited and the transaction recorded
/// * `Ok(false)` - The balance does not cover the price; nothing was written
///
/// # Errors
/// [`Error::UserNotFound`] if the user does not exist, [`Error::MealNotFound`] if the meal is
/// unknown or has no price.
#[instrument(skip(db))]
pub async fn process_payment_at(
    db: &DatabaseConnection,
    user_id: i64,
    meal_id: i64,
    now: DateTime<Utc>,
) -> Result<bool> {
    let mut payer = user::get_required_user(db, user_id).await?;

    let price = match get_meal_price(db, meal_id).await? {
        Some(price) if price > Decimal::ZERO => price,
        _ => return Err(Error::MealNotFound { id: meal_id }),
    };

    loop {
        if payer.credits < price {
            info!(
                "User {} cannot pay {} for meal {} with balance {}",
                user_id, price, meal_id, payer.credits
            );
            return Ok(false);
        }

        // The balance write is the first statement so concurrent payers queue on the write lock
        let txn = db.begin().await?;
        if user::swap_credits(&txn, user_id, payer.credits, payer.credits - price).await? {
            append_transaction(&txn, user_id, price, transaction::MEAL_PAYMENT, meal_id, now)
                .await?;
            txn.commit().await?;

            info!("User {} paid {} for meal {}", user_id, price, meal_id);
            return Ok(true);
        }

        txn.rollback().await?;
        debug!("Balance of user {} moved during payment, re-reading", user_id);
        payer = user::get_required_user(db, user_id).await?;
    }
}
