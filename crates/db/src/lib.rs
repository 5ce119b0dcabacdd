//! PostgreSQL connection pool factory and module migration runner.

use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use shelf_kernel::settings::DatabaseSettings;
use shelf_kernel::Migration;

const MIGRATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        module TEXT NOT NULL,
        id TEXT NOT NULL,
        applied_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (module, id)
    )
"#;

/// Establish the shared connection pool from database settings.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_millis(settings.acquire_timeout_ms))
        .connect(&settings.url)
        .await
        .context("failed to connect to database")?;

    tracing::info!(
        max_connections = settings.max_connections,
        "database pool established"
    );

    Ok(pool)
}

/// Apply module-contributed migrations that have not run yet.
///
/// Applied migrations are recorded in a `_migrations` bookkeeping table keyed
/// by (module, id); re-running is a no-op for already-applied entries.
pub async fn run_migrations(
    pool: &PgPool,
    migrations: Vec<(String, Migration)>,
) -> anyhow::Result<()> {
    sqlx::query(MIGRATIONS_TABLE)
        .execute(pool)
        .await
        .context("failed to create migrations bookkeeping table")?;

    for (module, migration) in migrations {
        let applied = sqlx::query("SELECT 1 FROM _migrations WHERE module = $1 AND id = $2")
            .bind(&module)
            .bind(migration.id)
            .fetch_optional(pool)
            .await
            .context("failed to query migration state")?;

        if applied.is_some() {
            continue;
        }

        sqlx::raw_sql(migration.up)
            .execute(pool)
            .await
            .with_context(|| format!("failed to apply migration '{}/{}'", module, migration.id))?;

        sqlx::query("INSERT INTO _migrations (module, id) VALUES ($1, $2)")
            .bind(&module)
            .bind(migration.id)
            .execute(pool)
            .await
            .with_context(|| format!("failed to record migration '{}/{}'", module, migration.id))?;

        tracing::info!(module = %module, id = migration.id, "applied migration");
    }

    Ok(())
}

/// Release the connection pool during shutdown.
pub async fn close(pool: PgPool) {
    pool.close().await;
    tracing::info!("database pool closed");
}
