use clap::Parser;
use error_stack::{Result, ResultExt};
use thiserror::Error;

use daglig::config::Server as Config;
use daglig::database;
use daglig::App;

/// Run any pending database migrations
#[derive(Debug, Parser)]
pub struct MigrateCommand;

#[derive(Debug, Error)]
#[error("Failed to run database migrations")]
pub struct MigrateError;

pub fn run(_args: MigrateCommand) -> Result<(), MigrateError> {
    let config = Config::load().change_context(MigrateError)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .change_context(MigrateError)
        .attach_printable("could not build tokio runtime")?
        .block_on(async move {
            let app = App::new(config).await.change_context(MigrateError)?;
            database::migrations::run_pending(&app.primary_db)
                .await
                .change_context(MigrateError)
        })
}
