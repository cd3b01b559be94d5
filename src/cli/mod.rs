use clap::Parser;
use error_stack::{Result, ResultExt};
use thiserror::Error;

mod migrate;
mod server;

/// Command line options for daglig.
#[derive(Debug, Parser)]
#[command(
    about = "Utility suite for the daglig backend",
    version,
    author,
    long_about
)]
pub struct Cli {
    #[clap(subcommand)]
    pub subcommand: Subcommand,
}

#[derive(Debug, Error)]
#[error("Failed to run command")]
pub struct CliError;

impl Cli {
    pub fn run(self) -> Result<(), CliError> {
        init_tracing();

        match self.subcommand {
            Subcommand::Server(args) => self::server::run(args).change_context(CliError),
            Subcommand::Migrate(args) => self::migrate::run(args).change_context(CliError),
        }
    }
}

fn init_tracing() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    // The error layer is what makes `SpanTrace::capture` inside
    // `http::Error` return something useful.
    tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::DEBUG)
        .with(tracing_subscriber::fmt::layer().pretty())
        .with(ErrorLayer::default())
        .init();
}

#[derive(Debug, Parser)]
pub enum Subcommand {
    /// Expose the daglig HTTP server
    Server(self::server::ServerCommand),
    /// Run any pending database migrations
    Migrate(self::migrate::MigrateCommand),
}
