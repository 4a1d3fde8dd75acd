//! # Slotbook API
//!
//! The API crate provides the web server implementation for slotbook.
//! It exposes the schedule store over a small REST surface.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Map domain errors to HTTP responses
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework. Storage sits behind the
//! `ScheduleStore` trait, chosen once at startup.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Error mapping shared by all handlers
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use eyre::Result;
use slotbook_store::ScheduleStore;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Data source every handler reads from and writes to
    pub store: Arc<dyn ScheduleStore>,
    /// Zone given to schedules saved without a `timeZone`
    pub default_time_zone: String,
}

impl ApiState {
    pub fn new(store: Arc<dyn ScheduleStore>, default_time_zone: impl Into<String>) -> Self {
        Self {
            store,
            default_time_zone: default_time_zone.into(),
        }
    }
}

/// Builds the application router with all routes and middleware attached
///
/// Kept separate from [`start_server`] so tests can drive the router
/// without binding a socket.
pub fn build_router(state: Arc<ApiState>, config: &config::ApiConfig) -> Router {
    let app = Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Schedule management endpoints
        .merge(routes::schedule::routes())
        // Attach shared state to all routes
        .with_state(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin {:?}", origin);
                    None
                }
            })
            .collect();

        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .allow_origin(origins);

        app.layer(cors)
    } else {
        app
    };

    // Request tracing and timeout
    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    )
}

/// Installs the global log subscriber
///
/// Call once, before opening the store, so startup messages are printed.
/// Fails if a global subscriber is already set.
pub fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Starts the API server with the provided configuration and data source
///
/// This function configures routes and starts the HTTP server. Logging is
/// expected to be set up already through [`init_tracing`].
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// use slotbook_api::{config::ApiConfig, init_tracing, start_server};
/// use slotbook_store::open_store;
///
/// let config = ApiConfig::from_env()?;
/// init_tracing(config.log_level)?;
/// let store = open_store(config.store_backend, &config.data_dir).await?;
/// start_server(config, store).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, store: Arc<dyn ScheduleStore>) -> Result<()> {
    // Create shared state with dependencies
    let state = Arc::new(ApiState::new(store, config.default_time_zone.clone()));
    let app = build_router(state, &config);

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    info!("API available at http://{}/api/schedules", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
