use std::sync::Arc;

use fulfillment_runtime::config::RuntimeConfig;
use fulfillment_runtime::http::{AppState, build_router};
use shared::config::{QueryServiceConfig, load_dotenv};
use shared::dimensions::DimensionRegistry;
use shared::query_engine::HttpQueryEngine;
use shared::top_intent::{QueryBackend, TopIntentHandler};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(err) = load_dotenv() {
        eprintln!("{err}");
        std::process::exit(1);
    }

    let config = match RuntimeConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load fulfillment runtime config: {err}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter.as_str())
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .init();

    let backend = match QueryServiceConfig::from_env().and_then(HttpQueryEngine::new) {
        Ok(engine) => QueryBackend::Ready(Arc::new(engine)),
        Err(err) => {
            warn!(
                error = %err,
                "query service is misconfigured; every turn will return an apology"
            );
            QueryBackend::Misconfigured(err.to_string())
        }
    };
    let query_backend = backend.status();

    let app = build_router(AppState {
        handler: Arc::new(TopIntentHandler::new(DimensionRegistry::standard(), backend)),
    });

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, bind_addr = %config.bind_addr, "failed to bind fulfillment listener");
            std::process::exit(1);
        }
    };

    info!(
        bind_addr = %listener.local_addr().unwrap_or(config.bind_addr),
        query_backend,
        "fulfillment runtime listening"
    );

    if let Err(err) = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %err, "fulfillment runtime failed");
        std::process::exit(1);
    }

    info!("fulfillment runtime stopped");
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
    }
}
