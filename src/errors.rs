//! Unified error type for the meal credit ledger.
//!
//! Every fallible operation returns [`Result`]. Variants are grouped by [`ErrorKind`] so callers
//! can tell a missing record apart from bad input or a broken business rule (for example,
//! prompting a credit top-up instead of asking the user to fix a form).

use rust_decimal::Decimal;
use thiserror::Error;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced user, meal plan, meal, or transaction does not exist.
    NotFound,
    /// The request itself is malformed and was rejected before any side effect.
    InvalidArgument,
    /// The request is well-formed but the current state forbids it.
    BusinessRuleViolation,
    /// Storage, configuration, or environment failure.
    Infrastructure,
}

/// Errors raised by the ledger, its stores, and its configuration layer.
#[derive(Debug, Error)]
pub enum Error {
    /// No user with this id.
    #[error("User not found")]
    UserNotFound {
        /// Requested user id
        id: i64,
    },

    /// No meal plan with this id.
    #[error("Meal plan not found")]
    MealPlanNotFound {
        /// Requested meal plan id
        id: i64,
    },

    /// No priced meal with this id.
    #[error("Meal not found")]
    MealNotFound {
        /// Requested meal id
        id: i64,
    },

    /// No transaction with this id.
    #[error("Transaction not found")]
    TransactionNotFound {
        /// Requested transaction id
        id: i64,
    },

    /// Malformed input such as a non-positive id, an empty name, or an inverted window.
    #[error("{message}")]
    InvalidArgument {
        /// Human-readable description of the rejected input
        message: String,
    },

    /// A price or credit amount outside its allowed range.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// The user already references a meal plan.
    #[error("User is already subscribed to a meal plan")]
    AlreadySubscribed {
        /// User id
        user_id: i64,
        /// Plan the user currently references
        current_plan_id: i64,
    },

    /// The current time lies outside the plan's validity window.
    #[error("Meal plan is not active")]
    MealPlanNotActive {
        /// Meal plan id
        plan_id: i64,
    },

    /// The user's balance does not cover the price.
    #[error("User does not have enough credits")]
    InsufficientCredits {
        /// Balance at the time of the check
        current: Decimal,
        /// Amount that would have been debited
        required: Decimal,
    },

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Details about the failure
        message: String,
    },

    /// Database error surfaced by `SeaORM`.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Returns the category this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UserNotFound { .. }
            | Self::MealPlanNotFound { .. }
            | Self::MealNotFound { .. }
            | Self::TransactionNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidArgument { .. } | Self::InvalidAmount { .. } => {
                ErrorKind::InvalidArgument
            }
            Self::AlreadySubscribed { .. }
            | Self::MealPlanNotActive { .. }
            | Self::InsufficientCredits { .. } => ErrorKind::BusinessRuleViolation,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) | Self::EnvVar(_) => {
                ErrorKind::Infrastructure
            }
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_messages_match_ledger_wording() {
        let err = Error::InsufficientCredits {
            current: dec!(10),
            required: dec!(35),
        };
        assert_eq!(err.to_string(), "User does not have enough credits");
        assert_eq!(Error::UserNotFound { id: 1 }.to_string(), "User not found");
        assert_eq!(
            Error::MealPlanNotFound { id: 1 }.to_string(),
            "Meal plan not found"
        );
        assert_eq!(
            Error::invalid_argument("Meal plan name cannot be empty").to_string(),
            "Meal plan name cannot be empty"
        );
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(Error::MealNotFound { id: 3 }.kind(), ErrorKind::NotFound);
        assert_eq!(
            Error::InvalidAmount { amount: dec!(-1) }.kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            Error::MealPlanNotActive { plan_id: 1 }.kind(),
            ErrorKind::BusinessRuleViolation
        );
        assert_eq!(
            Error::AlreadySubscribed {
                user_id: 1,
                current_plan_id: 2
            }
            .kind(),
            ErrorKind::BusinessRuleViolation
        );
        assert_eq!(
            Error::Config {
                message: "bad".to_string()
            }
            .kind(),
            ErrorKind::Infrastructure
        );
    }
}
