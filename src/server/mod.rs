//! Flight document service.
//!
//! Routes, served both at the root and under `/flight`:
//! - `POST /`: insert a flight document, answers `201` with the stored copy
//! - `GET /?option=airline|airport&option_chosen=..`: monthly travel counts
//!
//! plus `GET /health`.

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::ServerConfig;
use handlers::{create_flight_handler, health_check, monthly_travel_handler};

pub mod aggregation;
pub mod document_store;
pub mod handlers;
pub mod models;

pub use document_store::{
    DocumentStore, DocumentStoreError, InMemoryDocumentStore, MongoDocumentStore,
};

#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<dyn DocumentStore>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(documents: Arc<dyn DocumentStore>, config: ServerConfig) -> Self {
        Self { documents, config }
    }
}

pub fn router(app_state: AppState) -> Router {
    let max_body_bytes = app_state.config.max_body_bytes;

    let flights = Router::new().route(
        "/",
        get(monthly_travel_handler).post(create_flight_handler),
    );

    Router::new()
        .route("/health", get(health_check))
        .merge(flights.clone())
        .nest("/flight", flights)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(CatchPanicLayer::new())
        .with_state(Arc::new(app_state))
}

pub async fn run_with_config(
    config: ServerConfig,
    documents: Arc<dyn DocumentStore>,
) -> std::io::Result<()> {
    log::info!(
        "Server configuration: http={}:{}, max_body_bytes={}",
        config.http_host,
        config.http_port,
        config.max_body_bytes
    );

    let http_bind_address = config.bind_address();
    let app = router(AppState::new(documents, config.clone()));

    let http_listener = match TcpListener::bind(&http_bind_address).await {
        Ok(listener) => {
            log::info!("Successfully bound HTTP listener to {}", http_bind_address);
            listener
        }
        Err(e) => {
            log::error!(
                "Failed to bind HTTP listener to {}: {}",
                http_bind_address,
                e
            );
            log::error!("  Is another process using port {}?", config.http_port);
            return Err(e);
        }
    };

    println!("flightgraph document service is running");
    println!("  HTTP API: http://{}", http_bind_address);

    axum::serve(http_listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to register SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => println!("Received SIGINT, shutting down..."),
        _ = terminate => println!("Received SIGTERM, shutting down..."),
    }
}
