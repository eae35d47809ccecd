use baytdesign::{
    config::{database, settings},
    core::{repair, seed},
    errors::Result,
};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load settings and the starter catalog
    let app_config = settings::load_app_configuration()
        .inspect_err(|e| error!("Failed to load application configuration: {}", e))?;
    info!(
        include_cart_in_budget = app_config.settings.include_cart_in_budget,
        currency = %app_config.settings.currency_code,
        "Loaded application configuration."
    );

    // 4. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database schema ready."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed the catalog (idempotent)
    seed::seed_catalog(&db, &app_config.catalog)
        .await
        .inspect_err(|e| error!("Failed to seed catalog: {}", e))?;

    // 6. Rewrite any stored amounts that no longer parse
    if app_config.settings.repair_on_startup {
        repair::repair_decimal_fields(&db)
            .await
            .inspect_err(|e| error!("Decimal repair failed: {}", e))?;
    }

    db.close().await?;
    Ok(())
}
