//! # Routes
//!
//! Axum router configuration for the checkout gateway.
//!
//! - `POST /api/create-checkout-session` - hosted checkout session
//! - `POST /api/create-payment-intent` - payment intent + client secret
//! - `POST /webhook` - provider webhook (raw body, signature-verified)
//! - `GET  /health` - health check
//! - Everything else falls back to the static frontend bundle, with an
//!   index-document fallback for unknown paths.

use crate::handlers;
use crate::state::{AppConfig, AppState};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::warn;

/// Build the CORS layer from the configured frontend origin.
///
/// A concrete origin gets credentials; `"*"` (or an unparseable origin)
/// falls back to a permissive layer without credentials, since wildcard
/// origins cannot be combined with credentialed requests.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.frontend_url == "*" {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    match config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
        Err(_) => {
            warn!(
                "Invalid FRONTEND_URL {:?}, falling back to permissive CORS",
                config.frontend_url
            );
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let api_routes = Router::new()
        .route(
            "/create-checkout-session",
            post(handlers::create_checkout_session),
        )
        .route(
            "/create-payment-intent",
            post(handlers::create_payment_intent),
        )
        // Unknown API paths must 404, not fall back to the frontend
        .fallback(handlers::api_not_found);

    // Static frontend bundle with index-document fallback, so unknown
    // routes render the pricing page instead of a 404.
    let static_dir = std::path::PathBuf::from(&state.config.static_dir);
    let static_files =
        ServeDir::new(&static_dir).not_found_service(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes)
        // Webhook takes the raw body; it must never pass through CORS
        // preflight or body-rewriting middleware.
        .route("/webhook", post(handlers::webhook))
        .fallback_service(static_files)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
