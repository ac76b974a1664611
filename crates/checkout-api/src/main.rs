//! # checkout-server
//!
//! Payment checkout gateway over Stripe.
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export STRIPE_WEBHOOK_SECRET=whsec_...
//! export FRONTEND_URL=http://localhost:3000
//!
//! # Run the server
//! checkout-server
//! ```

use checkout_api::{routes, state::AppState};
use checkout_core::PaymentProvider;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;

    info!("Payment provider: {}", state.provider.provider_name());
    info!("Allowed frontend origin: {}", state.config.frontend_url);
    info!("Static frontend dir: {}", state.config.static_dir);
    info!(
        "Amount bounds: {}..={} cents",
        state.config.amount_limits.min_cents, state.config.amount_limits.max_cents
    );

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("checkout-server v{} listening on http://{}", env!("CARGO_PKG_VERSION"), addr);
    info!("Checkout: POST http://{}/api/create-checkout-session", addr);
    info!("Webhook:  POST http://{}/webhook", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
