use error_stack::ResultExt;
use thiserror::Error;
use tokio::time::Instant;
use tracing::info;

use super::Pool;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

#[derive(Debug, Error)]
#[error("Failed to run database migrations")]
pub struct MigrationError;

#[tracing::instrument(skip_all, name = "migrations.run_pending")]
pub async fn run_pending(pool: &Pool) -> error_stack::Result<(), MigrationError> {
    let now = Instant::now();
    info!("Performing database migrations... (this may take a while)");

    MIGRATOR
        .run(&pool.pool)
        .await
        .change_context(MigrationError)?;

    let elapsed = now.elapsed();
    info!("Successfully performed database migrations! took {elapsed:.2?}");

    Ok(())
}
