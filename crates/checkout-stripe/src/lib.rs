//! # checkout-stripe
//!
//! Stripe payment provider for the checkout-rs gateway.
//!
//! Implements `checkout_core::PaymentProvider` over Stripe's form-encoded
//! REST API:
//!
//! - Hosted checkout sessions (`/v1/checkout/sessions`) with a single
//!   ad-hoc "Custom Payment" line item
//! - Payment intents (`/v1/payment_intents`) with automatic payment-method
//!   selection
//! - Webhook signature verification (HMAC-SHA256 over the raw body)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_stripe::StripeProvider;
//! use checkout_core::{CheckoutSessionParams, PaymentProvider};
//!
//! let provider = StripeProvider::from_env()?;
//!
//! let session = provider.create_checkout_session(&CheckoutSessionParams {
//!     amount_cents: 2900,
//!     currency: "usd".into(),
//!     success_url: "https://example.com/success".into(),
//!     cancel_url: "https://example.com/cancel".into(),
//!     idempotency_key: None,
//! }).await?;
//!
//! // Redirect user to session.checkout_url
//! ```

pub mod config;
pub mod provider;
pub mod webhook;

// Re-exports
pub use config::StripeConfig;
pub use provider::StripeProvider;

#[cfg(feature = "test-signing")]
pub use webhook::sign_payload;
