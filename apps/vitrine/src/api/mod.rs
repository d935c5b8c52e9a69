//! # Vitrine HTTP API Module
//!
//! The storage endpoint that backs the remote provider, built on axum.
//!
//! ## Endpoints
//!
//! - `GET|POST <route>?action=…` - multiplexed endpoint (default route `/api`)
//!   - `login` (POST) - member panel login
//!   - `get_storage&key=…` (GET) - read `config`, `features` or `content`
//!   - `save_storage` (POST) - replace a document
//!   - `add_log` (POST) - append an audit entry
//!   - `get_logs` (GET) - newest audit entries, at most 100
//!   - anything else - online status marker
//! - `GET /health` - Health check
//!
//! ## Security Configuration
//!
//! - `server.cors_origins`: allowed origins, `["*"]` for all (default: localhost only)
//! - `server.rate_limit`: requests per second (default: 100, 0 to disable)
//! - `server.api_key`: if set, mutating actions require a Bearer token

mod auth;
mod handlers;
pub mod members;
mod middleware;
mod types;

pub use auth::keys_match;
pub use handlers::{endpoint_handler, health_handler};
pub use middleware::create_rate_limiter;
pub use types::{
    Action, ActionQuery, AddLogRequest, ApiResponse, HealthResponse, LoginRequest, ONLINE_STATUS,
    SaveStorageRequest,
};

use crate::config::{DemoMemberConfig, ServerConfig};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::get,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use vitrine_core::KvStore;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: the key-value store holding documents, the audit
/// ring and member accounts.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<KvStore>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<KvStore>) -> Self {
        Self { store }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from `server.cors_origins`.
///
/// - `["*"]`: allows all origins
/// - unset: localhost only
/// - otherwise: the listed origins
fn build_cors_layer(origins: Option<&[String]>) -> CorsLayer {
    match origins {
        Some([wildcard]) if wildcard == "*" => {
            tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                restricted_cors(allowed_origins)
            }
        }
        None => {
            tracing::info!("CORS: No origins configured, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

fn restricted_cors(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static("x-requested-with"),
        ])
}

/// Restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:5173",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5173",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|o| o.parse().ok())
    .collect();
    restricted_cors(origins)
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting - if enabled
/// 5. Authentication - mutating actions only, if a key is configured
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let route = if config.route.starts_with('/') {
        config.route.clone()
    } else {
        format!("/{}", config.route)
    };

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route(
            &route,
            get(handlers::endpoint_handler).post(handlers::endpoint_handler),
        );

    match config.api_key.as_deref().filter(|k| !k.is_empty()) {
        Some(key) => {
            tracing::info!("API key authentication enabled for mutating actions");
            router = router.layer(axum_middleware::from_fn_with_state(
                Arc::<str>::from(key),
                auth::api_key_auth_middleware,
            ));
        }
        None => {
            tracing::warn!(
                "API key authentication DISABLED - anyone can write documents and audit entries. \
                 Set server.api_key or VITRINE_API_KEY to enable it."
            );
        }
    }

    if config.rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", config.rate_limit);
        router = router.layer(axum_middleware::from_fn_with_state(
            middleware::create_rate_limiter(config.rate_limit),
            middleware::rate_limit_middleware,
        ));
    } else {
        tracing::info!("Rate limiting disabled");
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(config.cors_origins.as_deref()))
                .layer(axum::extract::DefaultBodyLimit::max(config.body_limit_bytes)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Create the configured demo account if it does not exist yet.
pub fn provision_demo_member(store: &KvStore, demo: &DemoMemberConfig) -> Result<(), members::MemberError> {
    if members::provision_member(store, &demo.email, &demo.password, &demo.plan, demo.balance)? {
        tracing::info!(email = %demo.email, "Provisioned demo member");
    }
    Ok(())
}

/// Start the HTTP server.
pub async fn run_server(store: Arc<KvStore>, config: &ServerConfig) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let router = create_router(AppState::new(store), config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Vitrine HTTP server listening on {} (route {})", addr, config.route);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
