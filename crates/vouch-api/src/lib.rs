//! HTTP server for cover letter experience extraction
//!
//! Exposes the application lifecycle over a small JSON API:
//!
//! - `POST /api/v1/applications` submits a cover letter
//! - `POST /api/v1/applications/:id/select-experience` runs extraction
//!   and promotes the best candidate
//! - `GET /api/v1/applications/:id` fetches an application
//! - `GET /api/v1/applications/:id/experiences` lists extracted
//!   experiences
//! - `GET /health` reports server health
//!
//! The server wires a SQLite store and an OpenAI-compatible completion
//! provider into an [`service::ApplicationService`] and serves it with
//! axum.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod handlers;
pub mod service;

use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::handlers::{create_router, AppState};
use crate::service::ApplicationService;
use std::sync::Arc;
use vouch_llm::OpenAiProvider;
use vouch_store::SqliteStore;

/// Errors that prevent the server from starting or keep it from serving
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The database could not be opened or initialized
    #[error("Store error: {0}")]
    Store(#[from] vouch_store::StoreError),

    /// The listen address could not be bound
    #[error("Bind error: {0}")]
    Bind(#[from] std::io::Error),

    /// The server loop terminated with an error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build the application stack from the configuration and serve it
///
/// Initializes logging, opens the database, constructs the provider,
/// and blocks on the axum server until it exits.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    tracing_subscriber::fmt::init();

    info!("Starting vouch-api server");
    info!("Database path: {}", config.database_path);
    info!(
        "Completion provider: {} ({})",
        config.provider.endpoint, config.provider.model
    );

    let store = SqliteStore::new(&config.database_path)?;
    let provider = OpenAiProvider::new(config.provider.resolve_api_key())
        .with_endpoint(config.provider.endpoint.clone())
        .with_model(config.provider.model.clone());
    let service = ApplicationService::new(store, provider);
    let state = AppState {
        service: Arc::new(service),
    };
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
