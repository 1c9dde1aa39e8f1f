#![deny(missing_docs)]

//! # Restdoc Web Binary
//!
//! Entry point for the Actix Web server.

use actix_web::{web, App, HttpServer};
use restdoc_core::GeneratorConfig;
use restdoc_web::config::WebConfig;
use restdoc_web::configure;
use restdoc_web::users::UserStore;
use std::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn build_server(
    listener: TcpListener,
    generator_config: GeneratorConfig,
) -> std::io::Result<actix_web::dev::Server> {
    let store = web::Data::new(UserStore::new());
    let generator_config = web::Data::new(generator_config);
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(generator_config.clone())
            .configure(configure)
    })
    .listen(listener)?
    .run())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed (tests).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

async fn run(config: WebConfig) -> std::io::Result<()> {
    let generator_config = config
        .load_generator_config()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string()))?;

    let listener = TcpListener::bind(&config.bind)?;
    info!(bind = %config.bind, "starting server");
    let server = build_server(listener, generator_config)?;

    if config.oneshot {
        // The server must be polled for the stop signal to be handled.
        let handle = server.handle();
        actix_web::rt::spawn(server);
        handle.stop(true).await;
        info!("oneshot mode, server stopped");
        return Ok(());
    }

    server.await
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing();
    run(WebConfig::from_env()).await
}
