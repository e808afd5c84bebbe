use dotenvy::dotenv;
use meal_credits::{
    config::{catalog, database},
    core::seed,
    errors::Result,
};
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();

    // 3. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    // 4. Seed plans, meals, and users from the catalog, if there is one
    let catalog_path = catalog::get_catalog_path();
    if Path::new(&catalog_path).exists() {
        let loaded = catalog::load_catalog(&catalog_path)?;
        let summary = seed::seed_catalog(&db, &loaded)
            .await
            .inspect_err(|e| error!("Failed to seed catalog: {}", e))?;
        info!(
            "Catalog {} applied: {} plans, {} meals, {} users created",
            catalog_path, summary.plans_created, summary.meals_created, summary.users_created
        );
    } else {
        warn!("Catalog file {} not found, skipping seeding", catalog_path);
    }

    Ok(())
}
