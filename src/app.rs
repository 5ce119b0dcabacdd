//! Application bootstrap: settings, telemetry, database, modules, HTTP.

use anyhow::Context;

use shelf_kernel::settings::Settings;
use shelf_kernel::{InitCtx, ModuleRegistry};

use crate::modules;

/// Run the full service: migrate, start modules, serve until shutdown.
pub async fn run() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load shelf settings")?;
    shelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(env = ?settings.environment, "shelf-app bootstrap starting");

    let pool = shelf_db::connect(&settings.database).await?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);

    shelf_db::run_migrations(&pool, registry.collect_migrations()).await?;

    let ctx = InitCtx {
        settings: &settings,
        db: &pool,
    };
    registry.init_core_modules(&ctx).await?;
    registry.init_custom_modules(&ctx).await?;
    registry.start_core_modules(&ctx).await?;
    registry.start_custom_modules(&ctx).await?;

    shelf_http::start_server(&registry, &settings, pool.clone()).await?;

    // Serve returned: shutdown signal received. Stop custom modules first,
    // then release the pool.
    registry.stop_custom_modules().await?;
    registry.stop_core_modules().await?;
    shelf_db::close(pool).await;

    tracing::info!("shelf-app shut down cleanly");
    Ok(())
}

/// Apply pending module migrations and exit.
pub async fn migrate() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load shelf settings")?;
    shelf_telemetry::init(&settings.telemetry)?;

    let pool = shelf_db::connect(&settings.database).await?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);

    shelf_db::run_migrations(&pool, registry.collect_migrations()).await?;
    shelf_db::close(pool).await;
    Ok(())
}
