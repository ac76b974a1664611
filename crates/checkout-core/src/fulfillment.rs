//! # Fulfillment Dispatch
//!
//! Event-type dispatch for verified webhook events. Fulfillment itself is
//! an external collaborator; the `FulfillmentHandler` trait is its
//! contract, and the shipping default just logs the trigger.

use crate::error::PaymentResult;
use crate::event::{WebhookEvent, WebhookEventType};
use std::sync::Arc;
use tracing::{debug, info};

/// Webhook event handler trait.
///
/// Implement this to attach real fulfillment (order creation, entitlement
/// grants, receipts). Default methods log and succeed.
#[allow(unused_variables)]
pub trait FulfillmentHandler: Send + Sync {
    /// Called when a hosted checkout session completes
    fn on_checkout_completed(&self, event: &WebhookEvent) -> PaymentResult<()> {
        info!(
            session_id = ?event.session_id,
            amount = ?event.amount,
            currency = ?event.currency,
            payment_status = ?event.payment_status,
            "Checkout session completed, fulfillment triggered"
        );
        Ok(())
    }

    /// Called when a payment intent succeeds
    fn on_payment_intent_succeeded(&self, event: &WebhookEvent) -> PaymentResult<()> {
        info!(
            payment_intent_id = ?event.payment_intent_id,
            amount = ?event.amount,
            currency = ?event.currency,
            "Payment intent succeeded, fulfillment triggered"
        );
        Ok(())
    }

    /// Called for event types this gateway does not act on
    fn on_unknown_event(&self, event: &WebhookEvent) -> PaymentResult<()> {
        debug!(event_type = event.event_type.as_tag(), "Unhandled webhook event type");
        Ok(())
    }
}

/// Default handler: logs fulfillment triggers, performs no side effects
pub struct LoggingFulfillment;

impl FulfillmentHandler for LoggingFulfillment {}

/// Type alias for a shared fulfillment handler
pub type BoxedFulfillmentHandler = Arc<dyn FulfillmentHandler>;

/// Dispatch a verified event to the matching handler method
pub fn dispatch_event(handler: &dyn FulfillmentHandler, event: &WebhookEvent) -> PaymentResult<()> {
    match &event.event_type {
        WebhookEventType::CheckoutCompleted => handler.on_checkout_completed(event),
        WebhookEventType::PaymentIntentSucceeded => handler.on_payment_intent_succeeded(event),
        WebhookEventType::Unknown(_) => handler.on_unknown_event(event),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaymentError;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn event_of_type(event_type: WebhookEventType) -> WebhookEvent {
        WebhookEvent {
            event_id: "evt_test".to_string(),
            event_type,
            provider: "stripe".to_string(),
            session_id: Some("cs_test".to_string()),
            payment_intent_id: Some("pi_test".to_string()),
            amount: Some(2900),
            currency: Some("usd".to_string()),
            payment_status: Some("paid".to_string()),
            raw_data: None,
            timestamp: Utc::now(),
        }
    }

    #[derive(Default)]
    struct CountingHandler {
        checkouts: AtomicUsize,
        intents: AtomicUsize,
        unknown: AtomicUsize,
    }

    impl FulfillmentHandler for CountingHandler {
        fn on_checkout_completed(&self, _event: &WebhookEvent) -> PaymentResult<()> {
            self.checkouts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn on_payment_intent_succeeded(&self, _event: &WebhookEvent) -> PaymentResult<()> {
            self.intents.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn on_unknown_event(&self, _event: &WebhookEvent) -> PaymentResult<()> {
            self.unknown.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_dispatch_routes_by_type() {
        let handler = CountingHandler::default();

        dispatch_event(&handler, &event_of_type(WebhookEventType::CheckoutCompleted)).unwrap();
        dispatch_event(
            &handler,
            &event_of_type(WebhookEventType::PaymentIntentSucceeded),
        )
        .unwrap();
        dispatch_event(
            &handler,
            &event_of_type(WebhookEventType::Unknown("invoice.paid".into())),
        )
        .unwrap();

        assert_eq!(handler.checkouts.load(Ordering::SeqCst), 1);
        assert_eq!(handler.intents.load(Ordering::SeqCst), 1);
        assert_eq!(handler.unknown.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_logging_handler_acknowledges_everything() {
        let handler = LoggingFulfillment;

        assert!(dispatch_event(&handler, &event_of_type(WebhookEventType::CheckoutCompleted)).is_ok());
        assert!(dispatch_event(
            &handler,
            &event_of_type(WebhookEventType::Unknown("charge.refunded".into()))
        )
        .is_ok());
    }

    #[test]
    fn test_handler_errors_propagate() {
        struct FailingHandler;

        impl FulfillmentHandler for FailingHandler {
            fn on_checkout_completed(&self, _event: &WebhookEvent) -> PaymentResult<()> {
                Err(PaymentError::FulfillmentFailed("downstream down".into()))
            }
        }

        let err = dispatch_event(
            &FailingHandler,
            &event_of_type(WebhookEventType::CheckoutCompleted),
        )
        .unwrap_err();
        assert_eq!(err.status_code(), 500);
    }
}
