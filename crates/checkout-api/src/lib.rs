//! # checkout-api
//!
//! HTTP API layer for the checkout-rs payment gateway.
//!
//! This crate provides:
//! - Axum-based HTTP server with CORS and request tracing
//! - REST endpoints for checkout sessions and payment intents
//! - Signature-verified, deduplicated webhook consumer
//! - Static frontend serving with index-document fallback
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/create-checkout-session` | Create hosted checkout session |
//! | POST | `/api/create-payment-intent` | Create payment intent |
//! | POST | `/webhook` | Stripe webhook |
//! | GET | `/*` | Static frontend bundle |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
