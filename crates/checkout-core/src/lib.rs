//! # checkout-core
//!
//! Core types and traits for the checkout-rs payment gateway.
//!
//! This crate provides:
//! - `PaymentProvider` trait decoupling endpoints from any provider SDK
//! - `AmountLimits` / `validate_amount` for custom-amount bounds checking
//! - `WebhookEvent` and the `FulfillmentHandler` dispatch seam
//! - `ProcessedEventStore` for at-least-once delivery dedup
//! - `PaymentError` for typed error handling

pub mod amount;
pub mod error;
pub mod event;
pub mod fulfillment;
pub mod idempotency;
pub mod provider;

// Re-exports for convenience
pub use amount::{validate_amount, AmountLimits, DEFAULT_MAX_AMOUNT_CENTS, DEFAULT_MIN_AMOUNT_CENTS};
pub use error::{PaymentError, PaymentResult};
pub use event::{WebhookEvent, WebhookEventType};
pub use fulfillment::{
    dispatch_event, BoxedFulfillmentHandler, FulfillmentHandler, LoggingFulfillment,
};
pub use idempotency::{BoxedProcessedEventStore, InMemoryProcessedEvents, ProcessedEventStore};
pub use provider::{
    BoxedPaymentProvider, CheckoutSessionParams, HostedCheckout, PaymentIntent, PaymentProvider,
};
