use std::sync::Arc;

mod config;
mod error;
mod handler;
mod http;
mod logger;
mod routing;
mod server;

use error::StartupError;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load().map_err(StartupError::from)?;
    logger::init(&cfg.logging).map_err(StartupError::from)?;

    // Fixed for the life of the process; conflicts abort startup
    let router = handler::service_routes().map_err(StartupError::from)?;

    // Build the Tokio runtime, sizing the worker pool from config
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, router))?;
    Ok(())
}

async fn async_main(cfg: config::Config, router: routing::Router) -> Result<(), StartupError> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;

    logger::log_server_start(&listener.local_addr()?, &cfg);
    logger::log_routes(&router);

    let shutdown = Arc::new(server::ShutdownSignal::new());
    server::start_signal_handler(Arc::clone(&shutdown))?;

    let state = Arc::new(config::AppState::new(cfg, router));
    server::run(listener, state, shutdown.subscribe()).await;

    Ok(())
}
