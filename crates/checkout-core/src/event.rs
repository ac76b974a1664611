//! # Webhook Events
//!
//! Provider-agnostic representation of a verified webhook event.
//! Events are consumed, never mutated, and never persisted beyond the
//! processed-event store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Webhook event types this gateway reacts to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebhookEventType {
    /// Hosted checkout session completed (`checkout.session.completed`)
    CheckoutCompleted,
    /// Payment intent succeeded (`payment_intent.succeeded`)
    PaymentIntentSucceeded,
    /// Anything else: logged and acknowledged, never an error
    Unknown(String),
}

impl WebhookEventType {
    /// The provider's wire tag for this event type
    pub fn as_tag(&self) -> &str {
        match self {
            WebhookEventType::CheckoutCompleted => "checkout.session.completed",
            WebhookEventType::PaymentIntentSucceeded => "payment_intent.succeeded",
            WebhookEventType::Unknown(tag) => tag,
        }
    }
}

/// A verified, parsed webhook event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Provider-assigned event identifier (dedup key)
    pub event_id: String,
    /// Event type tag
    pub event_type: WebhookEventType,
    /// Provider that delivered the event
    pub provider: String,
    /// Checkout session id, when the event carries one
    pub session_id: Option<String>,
    /// Payment intent id, when the event carries one
    pub payment_intent_id: Option<String>,
    /// Amount in minor units, when the event carries one
    pub amount: Option<i64>,
    /// Lowercase ISO currency code, when the event carries one
    pub currency: Option<String>,
    /// Payment status reported by the provider ("paid", "succeeded", ...)
    pub payment_status: Option<String>,
    /// Raw event data object for anything the typed fields omit
    pub raw_data: Option<serde_json::Value>,
    /// Provider-reported creation time
    pub timestamp: DateTime<Utc>,
}
