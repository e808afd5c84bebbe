/// Database configuration and connection management
pub mod database;

/// Plan, meal, and user catalog loading from config.toml
pub mod catalog;
