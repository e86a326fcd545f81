use anyhow::Context;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// Schema migrations embedded from the "migrations" directory at compile time
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const MAX_CONNECTIONS: u32 = 20;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(2);

/// Builds the connection pool every request borrows its database connection from
pub async fn connect_sqlx(db_url: &str) -> Result<PgPool, anyhow::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(db_url)
        .await
        .context("connecting to the database")?;

    Ok(pool)
}

/// Applies any migrations the database hasn't seen yet. Already-applied migrations are skipped.
pub async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    MIGRATOR
        .run(pool)
        .await
        .context("applying database migrations")?;

    Ok(())
}

/// Rolls applied migrations back, newest first, until only those at or below `target_version`
/// remain. A target of 0 reverts everything.
pub async fn revert_migrations(pool: &PgPool, target_version: i64) -> Result<(), anyhow::Error> {
    MIGRATOR
        .undo(pool, target_version)
        .await
        .with_context(|| format!("reverting database migrations to version {target_version}"))?;

    Ok(())
}
