//! levelcache API Server
//!
//! Serves cached candle series and the support/resistance levels derived from
//! them, with health check and Prometheus metrics endpoints.

use dotenvy::dotenv;
use levelcache::config;
use levelcache::core::http::start_server;
use levelcache::logging;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let port = config::get_port();
    let env = config::get_environment();
    info!("Starting levelcache API Server");
    info!(environment = %env, "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
