use actix_web::{middleware::ErrorHandlers, web, HttpServer};
use clap::Parser;
use error_stack::{Result, ResultExt};
use std::net::IpAddr;
use std::num::NonZeroUsize;
use thiserror::Error;
use tracing_actix_web::TracingLogger;

use daglig::config::Server as Config;
use daglig::http;
use daglig::App;

/// Expose the daglig HTTP server
#[derive(Debug, Parser)]
pub struct ServerCommand {
    #[clap(long)]
    pub address: Option<IpAddr>,
    #[clap(long)]
    pub port: Option<u16>,
    #[clap(long)]
    pub workers: Option<NonZeroUsize>,
}

#[derive(Debug, Error)]
#[error("Failed to start HTTP server")]
pub struct StartServerError;

pub fn run(args: ServerCommand) -> Result<(), StartServerError> {
    let mut config = Config::load().change_context(StartServerError)?;
    args.override_config(&mut config);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .change_context(StartServerError)
        .attach_printable("could not build tokio runtime")?
        .block_on(serve(config, args.workers))
}

async fn serve(config: Config, workers: Option<NonZeroUsize>) -> Result<(), StartServerError> {
    let app = App::new(config).await.change_context(StartServerError)?;
    let bind = (app.config.ip, app.config.port);

    tracing::info!("listening on {}:{}", bind.0, bind.1);

    let mut server = HttpServer::new(move || {
        actix_web::App::new()
            .app_data(web::Data::new(app.clone()))
            .wrap(TracingLogger::<http::util::QuieterRootSpanBuilder>::new())
            .wrap(ErrorHandlers::new().default_handler(http::util::handle_actix_web_error))
            .configure(http::controllers::configure)
    });

    if let Some(workers) = workers {
        server = server.workers(workers.get());
    }

    server
        .bind(bind)
        .change_context(StartServerError)?
        .run()
        .await
        .change_context(StartServerError)
}

impl ServerCommand {
    fn override_config(&self, config: &mut Config) {
        // override server configuration if set by the cli
        if let Some(address) = self.address {
            config.ip = address;
        }

        if let Some(port) = self.port {
            config.port = port;
        }
    }
}
