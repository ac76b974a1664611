//! # Application State
//!
//! Shared state for the Axum application: the payment provider, the
//! processed-event store and the fulfillment handler all sit behind trait
//! objects so tests can inject mocks.

use checkout_core::{
    AmountLimits, BoxedFulfillmentHandler, BoxedPaymentProvider, BoxedProcessedEventStore,
    InMemoryProcessedEvents, LoggingFulfillment,
};
use checkout_stripe::StripeProvider;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Allowed frontend origin for CORS ("*" allows any)
    pub frontend_url: String,
    /// Directory holding the static frontend bundle
    pub static_dir: String,
    /// Custom-amount bounds in cents
    pub amount_limits: AmountLimits,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4000),
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| "frontend".to_string()),
            amount_limits: AmountLimits::from_env(),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment provider (Stripe in production, mocks in tests)
    pub provider: BoxedPaymentProvider,
    /// Webhook dedup bookkeeping
    pub processed_events: BoxedProcessedEventStore,
    /// Fulfillment dispatch target
    pub fulfillment: BoxedFulfillmentHandler,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create production state: Stripe provider from the environment,
    /// in-memory dedup store, log-only fulfillment.
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let provider = StripeProvider::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        Ok(Self {
            provider: Arc::new(provider),
            processed_events: Arc::new(InMemoryProcessedEvents::new()),
            fulfillment: Arc::new(LoggingFulfillment),
            config,
        })
    }

    /// Assemble state from explicit parts (tests, alternate wiring)
    pub fn with_parts(
        provider: BoxedPaymentProvider,
        processed_events: BoxedProcessedEventStore,
        fulfillment: BoxedFulfillmentHandler,
        config: AppConfig,
    ) -> Self {
        Self {
            provider,
            processed_events,
            fulfillment,
            config,
        }
    }
}
