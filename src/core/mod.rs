/// Read-only transaction history queries with empty-result notices
pub mod history;
/// Meal plan and meal creation, administration, and pricing
pub mod meal_plan;
/// Single-meal payments
pub mod payment;
/// Startup seeding from the TOML catalog
pub mod seed;
/// Plan subscriptions
pub mod subscription;
/// Append-only transaction store
pub mod transaction;
/// User lookup, creation, top-ups, and guarded debits
pub mod user;
