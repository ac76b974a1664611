//! # Payment Provider Trait
//!
//! Seam between the HTTP layer and whichever payment provider backs it.
//! Endpoint logic depends only on this trait and `PaymentError`, never on a
//! specific SDK's types or error hierarchy.

use crate::error::PaymentResult;
use crate::event::WebhookEvent;
use async_trait::async_trait;
use std::sync::Arc;

/// Parameters for creating a hosted checkout session
#[derive(Debug, Clone)]
pub struct CheckoutSessionParams {
    /// Amount in minor currency units
    pub amount_cents: i64,
    /// ISO currency code (any case; providers normalize)
    pub currency: String,
    /// Redirect target after successful payment
    pub success_url: String,
    /// Redirect target when the customer backs out
    pub cancel_url: String,
    /// Idempotency key; a fresh one is generated when absent
    pub idempotency_key: Option<String>,
}

/// A created hosted checkout session
#[derive(Debug, Clone)]
pub struct HostedCheckout {
    /// Provider session id
    pub session_id: String,
    /// URL to redirect the customer to
    pub checkout_url: String,
}

/// A created payment intent
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    /// Provider intent id
    pub intent_id: String,
    /// Secret the frontend needs to complete payment
    pub client_secret: String,
}

/// Core trait for payment provider implementations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a hosted checkout session and return its redirect URL.
    async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> PaymentResult<HostedCheckout>;

    /// Create a payment intent with automatic payment-method selection and
    /// return the client secret.
    async fn create_payment_intent(
        &self,
        amount_cents: i64,
        currency: &str,
    ) -> PaymentResult<PaymentIntent>;

    /// Verify a webhook signature against the raw body and parse the event.
    ///
    /// Fails closed with a configuration error when no webhook secret is
    /// configured.
    async fn verify_webhook(&self, payload: &[u8], signature: &str)
        -> PaymentResult<WebhookEvent>;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment provider (dynamic dispatch)
pub type BoxedPaymentProvider = Arc<dyn PaymentProvider>;
