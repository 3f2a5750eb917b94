//! # GymBook API
//!
//! The HTTP/JSON front end of the booking service: registration and login,
//! slot listing, booking, cancellation, and the staff-only deletion
//! endpoints.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into store calls
//! - **Middleware**: Session extraction and error mapping
//! - **Config**: Environment-driven server settings
//!
//! Handlers never touch a database directly; they go through the store
//! traits in `gymbook-core`, so the same router runs on Postgres or in
//! memory.

/// Configuration module for API settings
pub mod config;
/// Body and path extractors that report rejections as JSON errors
pub mod extract;
/// Request handlers
pub mod handlers;
/// Session authentication and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    http::{HeaderValue, Method, StatusCode, header},
};
use eyre::Result;
use gymbook_db::Stores;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::middleware::auth::SessionRegistry;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub stores: Stores,
    pub sessions: SessionRegistry,
}

impl ApiState {
    pub fn new(stores: Stores) -> Self {
        Self::with_sessions(stores, SessionRegistry::new())
    }

    pub fn with_sessions(stores: Stores, sessions: SessionRegistry) -> Self {
        Self { stores, sessions }
    }
}

/// Builds the application router with every endpoint attached.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Registration, login and logout
        .merge(routes::auth::routes())
        // General slots and their bookings
        .merge(routes::slots::routes())
        // Trainer-led classes
        .merge(routes::classes::routes())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true)
}

/// Starts the API server with the provided configuration and stores
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// let config = gymbook_api::config::ApiConfig::from_env()?;
/// let stores = gymbook_db::Stores::connect(config.database_url.as_deref(), config.lock_timeout).await?;
/// gymbook_api::start_server(config, stores).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, stores: Stores) -> Result<()> {
    let sessions = SessionRegistry::with_ttl(config.session_ttl);
    let state = Arc::new(ApiState::with_sessions(stores, sessions));
    let app = router(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    // Request timeout and request tracing
    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(HandleErrorLayer::new(|err: BoxError| async move {
                warn!("Request aborted: {}", err);
                StatusCode::REQUEST_TIMEOUT
            }))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
