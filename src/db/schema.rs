// src/db/schema.rs
// DOCUMENTATION: Schema migrations
// PURPOSE: Apply and undo the reversible scripts under migrations/

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Apply every pending migration
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    log::info!("Applying migrations");
    MIGRATOR.run(pool).await?;
    log::info!("Schema is up to date");
    Ok(())
}

/// Undo every applied migration newer than `target` (0 undoes all)
pub async fn rollback_to(pool: &PgPool, target: i64) -> Result<(), MigrateError> {
    log::info!("Rolling back migrations to version {}", target);
    MIGRATOR.undo(pool, target).await
}

/// Undo the most recently applied migration
pub async fn rollback(pool: &PgPool) -> Result<(), MigrateError> {
    let applied: Vec<i64> = sqlx::query_scalar(
        "SELECT version FROM _sqlx_migrations WHERE success ORDER BY version DESC",
    )
    .fetch_all(pool)
    .await?;

    if applied.is_empty() {
        log::warn!("No applied migrations to roll back");
        return Ok(());
    }

    rollback_to(pool, previous_version(&applied)).await
}

/// Version left in place after undoing the newest one
fn previous_version(applied_desc: &[i64]) -> i64 {
    applied_desc.get(1).copied().unwrap_or(0)
}
