//! Catalog configuration loading from a TOML file.
//!
//! The catalog lists the meal plans (with their meals) and the users that should exist when
//! the ledger starts. It is read once at startup and handed to
//! [`crate::core::seed::seed_catalog`].

use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

/// Fallback used when `CATALOG_PATH` is not set.
pub const DEFAULT_CATALOG_PATH: &str = "config.toml";

/// Configuration structure representing the entire catalog file
#[derive(Debug, Deserialize, Default)]
pub struct Catalog {
    /// Meal plans to seed
    #[serde(default)]
    pub plans: Vec<MealPlanConfig>,
    /// Users to seed
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

/// Configuration for a single meal plan
#[derive(Debug, Deserialize, Clone)]
pub struct MealPlanConfig {
    /// Unique plan name
    pub name: String,
    /// Subscription price in credits
    pub price: Decimal,
    /// Start of the validity window (RFC 3339)
    pub start_date: DateTime<Utc>,
    /// End of the validity window (RFC 3339)
    pub end_date: DateTime<Utc>,
    /// Meals offered by the plan
    #[serde(default)]
    pub meals: Vec<MealConfig>,
}

/// Configuration for a single meal
#[derive(Debug, Deserialize, Clone)]
pub struct MealConfig {
    /// Meal name
    pub name: String,
    /// Ingredient names
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Type tag
    pub meal_type: String,
    /// Single-purchase price in credits
    pub price: Decimal,
}

/// Configuration for a single user
#[derive(Debug, Deserialize, Clone)]
pub struct UserConfig {
    /// Display name
    pub name: String,
    /// Unique email
    pub email: String,
    /// Starting balance
    #[serde(default)]
    pub credits: Decimal,
}

/// Loads the catalog from a TOML file
///
/// # Errors
/// Returns [`Error::Config`] if the file cannot be read or the TOML is invalid.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path_ref = path.as_ref();
    tracing::debug!("Loading catalog from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read catalog file {}: {e}", path_ref.display()),
    })?;

    parse_catalog(&contents)
}

/// Parses catalog TOML that is already in memory.
pub fn parse_catalog(contents: &str) -> Result<Catalog> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalog: {e}"),
    })
}

/// Returns the catalog path from `CATALOG_PATH`, falling back to `config.toml`.
#[must_use]
pub fn get_catalog_path() -> String {
    std::env::var("CATALOG_PATH").unwrap_or_else(|_| DEFAULT_CATALOG_PATH.to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_catalog() {
        let toml_str = r#"
            [[plans]]
            name = "Student Plan - Weekly"
            price = 35.0
            start_date = "2024-11-18T00:00:00Z"
            end_date = "2024-11-22T23:59:59Z"

            [[plans.meals]]
            name = "Lasagna"
            ingredients = ["pasta", "beef", "tomato"]
            meal_type = "lunch"
            price = 8.5

            [[users]]
            name = "John Doe"
            email = "john.doe@test.ch"
            credits = 50.0
        "#;

        let catalog = parse_catalog(toml_str).unwrap();
        assert_eq!(catalog.plans.len(), 1);
        assert_eq!(catalog.plans[0].price, dec!(35));
        assert!(catalog.plans[0].start_date < catalog.plans[0].end_date);
        assert_eq!(catalog.plans[0].meals.len(), 1);
        assert_eq!(catalog.plans[0].meals[0].ingredients.len(), 3);
        assert_eq!(catalog.users[0].email, "john.doe@test.ch");
        assert_eq!(catalog.users[0].credits, dec!(50));
        assert_eq!(catalog.plans[0].meals[0].price, dec!(8.5));
    }

    #[test]
    fn test_parse_catalog_defaults() {
        let catalog = parse_catalog(
            r#"
            [[users]]
            name = "Jane Smith"
            email = "jane@example.com"
        "#,
        )
        .unwrap();
        assert!(catalog.plans.is_empty());
        assert_eq!(catalog.users[0].credits, Decimal::ZERO);
    }

    #[test]
    fn test_parse_catalog_rejects_bad_toml() {
        let result = parse_catalog("[[plans]]\nname = ");
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }

    #[test]
    fn test_load_catalog_missing_file() {
        let result = load_catalog("does/not/exist.toml");
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }
}
