//! Transaction store - Append-only access to the debit log.
//!
//! Rows are only ever inserted; ids come from the `SQLite` autoincrement key and therefore
//! strictly increase. All reads are scoped to a single user. Ordering is explicit on every
//! query: store order is id ascending, "latest" order is timestamp descending with ties kept in
//! id order.

use crate::{
    entities::{Transaction, transaction},
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use tracing::{debug, instrument};

/// Appends a debit to the log and returns the stored row with its new id.
///
/// # Arguments
/// * `user_id` - The debited user
/// * `amount` - Debited amount, must be positive
/// * `transaction_type` - [`transaction::MEAL_PAYMENT`] or [`transaction::SUBSCRIPTION`]
/// * `reference_id` - Meal id or plan id the debit paid for
/// * `timestamp` - When the debit happened
#[instrument(skip(db))]
pub async fn append_transaction<C>(
    db: &C,
    user_id: i64,
    amount: Decimal,
    transaction_type: &str,
    reference_id: i64,
    timestamp: DateTime<Utc>,
) -> Result<transaction::Model>
where
    C: ConnectionTrait,
{
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount { amount });
    }

    let model = transaction::ActiveModel {
        user_id: Set(user_id),
        amount: Set(amount),
        timestamp: Set(timestamp),
        transaction_type: Set(transaction_type.to_string()),
        reference_id: Set(reference_id),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    debug!(
        "Appended transaction {} for user {}: type='{}', amount={}",
        created.id, user_id, created.transaction_type, created.amount
    );
    Ok(created)
}

/// Retrieves a single transaction by id.
pub async fn get_transaction_by_id<C>(
    db: &C,
    transaction_id: i64,
) -> Result<Option<transaction::Model>>
where
    C: ConnectionTrait,
{
    Transaction::find_by_id(transaction_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all of a user's transactions in store order (oldest id first).
pub async fn get_transactions_by_user<C>(db: &C, user_id: i64) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a user's transactions whose UTC calendar date lies in `[start, end]`.
///
/// Both bounds are whole days and both are inclusive. Results are in store order.
pub async fn get_transactions_by_period<C>(
    db: &C,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    let mut query = Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::Timestamp.gte(start_of_day(start)));

    // No upper bound when `end` is the last representable date
    if let Some(next_day) = end.succ_opt() {
        query = query.filter(transaction::Column::Timestamp.lt(start_of_day(next_day)));
    }

    query
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves at most `limit` of a user's most recent transactions, newest first.
///
/// Transactions sharing a timestamp keep their insertion (id) order.
pub async fn get_last_transactions<C>(
    db: &C,
    user_id: i64,
    limit: u64,
) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .order_by_desc(transaction::Column::Timestamp)
        .order_by_asc(transaction::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
