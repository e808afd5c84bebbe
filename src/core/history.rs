//! Transaction history - Per-user queries over the debit log.
//!
//! An empty result is not an error. Each query returns a [`HistoryPage`] carrying the rows
//! together with an optional [`HistoryNotice`] explaining why nothing came back, so callers can
//! show the notice without tracking any state between calls.

use crate::{
    core::transaction as store,
    entities::transaction,
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::ConnectionTrait;
use std::fmt;
use tracing::{debug, instrument};

/// Why a history query returned no rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryNotice {
    /// The user has no transactions at all
    NoTransactions {
        /// Queried user id
        user_id: i64,
    },
    /// The filter window starts after it ends
    InvalidDateRange {
        /// Requested first day
        start: NaiveDate,
        /// Requested last day
        end: NaiveDate,
    },
    /// The filter window is valid but contains none of the user's transactions
    NoTransactionsInPeriod {
        /// Queried user id
        user_id: i64,
        /// First day of the window
        start: NaiveDate,
        /// Last day of the window
        end: NaiveDate,
    },
}

impl fmt::Display for HistoryNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTransactions { user_id } => {
                write!(f, "No transactions found for user with ID {user_id}")
            }
            Self::InvalidDateRange { .. } => {
                write!(f, "First date must be older than second date")
            }
            Self::NoTransactionsInPeriod {
                user_id,
                start,
                end,
            } => write!(
                f,
                "No transactions found for user with ID {user_id} between {start} and {end}"
            ),
        }
    }
}

/// Rows returned by a history query, plus a notice when the list is empty for a reason worth
/// reporting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoryPage {
    /// Matching transactions in the order documented by the query
    pub transactions: Vec<transaction::Model>,
    /// Set only when `transactions` is empty
    pub notice: Option<HistoryNotice>,
}

impl HistoryPage {
    fn with_rows(transactions: Vec<transaction::Model>, empty_notice: HistoryNotice) -> Self {
        let notice = transactions.is_empty().then_some(empty_notice);
        Self {
            transactions,
            notice,
        }
    }

    /// Returns true if the page holds no transactions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Human-readable notice text, if any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.notice.as_ref().map(ToString::to_string)
    }
}

fn validate_user_id(user_id: i64) -> Result<()> {
    if user_id <= 0 {
        return Err(Error::invalid_argument(
            "User ID must be a positive integer.",
        ));
    }
    Ok(())
}

/// All of a user's transactions, oldest id first.
#[instrument(skip(db))]
pub async fn get_history<C>(db: &C, user_id: i64) -> Result<HistoryPage>
where
    C: ConnectionTrait,
{
    validate_user_id(user_id)?;

    let rows = store::get_transactions_by_user(db, user_id).await?;
    debug!("Found {} transactions for user {}", rows.len(), user_id);
    Ok(HistoryPage::with_rows(
        rows,
        HistoryNotice::NoTransactions { user_id },
    ))
}

/// A user's transactions whose UTC date lies between `start` and `end`, both inclusive.
///
/// An inverted window is reported through [`HistoryNotice::InvalidDateRange`] rather than an
/// error.
#[instrument(skip(db))]
pub async fn get_filtered<C>(
    db: &C,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<HistoryPage>
where
    C: ConnectionTrait,
{
    validate_user_id(user_id)?;

    if start > end {
        debug!("Rejected inverted window {} > {}", start, end);
        return Ok(HistoryPage {
            transactions: Vec::new(),
            notice: Some(HistoryNotice::InvalidDateRange { start, end }),
        });
    }

    let rows = store::get_transactions_by_period(db, user_id, start, end).await?;
    Ok(HistoryPage::with_rows(
        rows,
        HistoryNotice::NoTransactionsInPeriod {
            user_id,
            start,
            end,
        },
    ))
}

/// At most `count` of a user's most recent transactions, newest first.
///
/// A non-positive `count` yields an empty page without a notice.
#[instrument(skip(db))]
pub async fn get_latest<C>(db: &C, user_id: i64, count: i64) -> Result<HistoryPage>
where
    C: ConnectionTrait,
{
    validate_user_id(user_id)?;

    if count <= 0 {
        return Ok(HistoryPage::default());
    }

    let rows = store::get_last_transactions(db, user_id, count.unsigned_abs()).await?;
    Ok(HistoryPage::with_rows(
        rows,
        HistoryNotice::NoTransactions { user_id },
    ))
}

/// Looks up one transaction by id.
///
/// # Errors
/// [`Error::InvalidArgument`] for a non-positive id, [`Error::TransactionNotFound`] if absent.
pub async fn get_transaction<C>(db: &C, transaction_id: i64) -> Result<transaction::Model>
where
    C: ConnectionTrait,
{
    if transaction_id <= 0 {
        return Err(Error::invalid_argument(
            "Transaction ID must be a positive integer.",
        ));
    }

    store::get_transaction_by_id(db, transaction_id)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })
}
