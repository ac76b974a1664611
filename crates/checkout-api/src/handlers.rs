//! # Request Handlers
//!
//! Axum request handlers for the checkout gateway: checkout-session and
//! payment-intent creation, the Stripe webhook consumer, and health.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use checkout_core::{
    dispatch_event, validate_amount, CheckoutSessionParams, PaymentError, PaymentProvider,
    ProcessedEventStore,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create checkout session request. All fields are declared optional so
/// presence is checked explicitly and reported as a 400, not a decode error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCheckoutSessionRequest {
    pub amount_cents: Option<i64>,
    pub currency: Option<String>,
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
}

/// Create payment intent request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePaymentIntentRequest {
    pub amount_cents: Option<i64>,
    pub currency: Option<String>,
}

/// Create checkout session response
#[derive(Debug, Serialize)]
pub struct CreateCheckoutSessionResponse {
    /// Hosted checkout URL (redirect the customer here)
    pub url: String,
}

/// Create payment intent response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentResponse {
    /// Secret the frontend uses to complete payment
    pub client_secret: String,
}

/// Webhook acknowledgement
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate: Option<bool>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Map a payment error to its HTTP response, logging the full detail
/// server-side and surfacing only the public message.
fn payment_error_to_response(err: PaymentError) -> HandlerError {
    error!("Request failed: {}", err);
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(err.public_message())))
}

fn bad_request(message: impl Into<String>) -> HandlerError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

/// Unwrap a JSON body, mapping decode failures (malformed JSON, non-integer
/// amounts) to a 400 instead of axum's default rejection.
fn require_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, HandlerError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => Err(bad_request(format!("Invalid request body: {}", rejection))),
    }
}

fn missing_fields_error(missing: Vec<&str>) -> HandlerError {
    bad_request(format!("Missing required fields: {}", missing.join(", ")))
}

// =============================================================================
// Handlers
// =============================================================================

/// 404 for unknown API paths, which must not fall back to the frontend
pub async fn api_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found")))
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Create a hosted checkout session
#[instrument(skip(state, payload))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    payload: Result<Json<CreateCheckoutSessionRequest>, JsonRejection>,
) -> Result<Json<CreateCheckoutSessionResponse>, HandlerError> {
    let request = require_json(payload)?;

    let mut missing = Vec::new();
    if request.amount_cents.is_none() {
        missing.push("amountCents");
    }
    if request.currency.is_none() {
        missing.push("currency");
    }
    if request.success_url.is_none() {
        missing.push("successUrl");
    }
    if request.cancel_url.is_none() {
        missing.push("cancelUrl");
    }
    if !missing.is_empty() {
        return Err(missing_fields_error(missing));
    }

    let amount_cents = request.amount_cents.unwrap_or_default();
    validate_amount(amount_cents, &state.config.amount_limits)
        .map_err(payment_error_to_response)?;

    let params = CheckoutSessionParams {
        amount_cents,
        currency: request.currency.unwrap_or_default(),
        success_url: request.success_url.unwrap_or_default(),
        cancel_url: request.cancel_url.unwrap_or_default(),
        idempotency_key: None,
    };

    let session = state
        .provider
        .create_checkout_session(&params)
        .await
        .map_err(payment_error_to_response)?;

    info!(
        "Created checkout session {} for {} {}",
        session.session_id, params.amount_cents, params.currency
    );

    Ok(Json(CreateCheckoutSessionResponse {
        url: session.checkout_url,
    }))
}

/// Create a payment intent
#[instrument(skip(state, payload))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    payload: Result<Json<CreatePaymentIntentRequest>, JsonRejection>,
) -> Result<Json<CreatePaymentIntentResponse>, HandlerError> {
    let request = require_json(payload)?;

    let mut missing = Vec::new();
    if request.amount_cents.is_none() {
        missing.push("amountCents");
    }
    if request.currency.is_none() {
        missing.push("currency");
    }
    if !missing.is_empty() {
        return Err(missing_fields_error(missing));
    }

    let amount_cents = request.amount_cents.unwrap_or_default();
    let currency = request.currency.unwrap_or_default();
    validate_amount(amount_cents, &state.config.amount_limits)
        .map_err(payment_error_to_response)?;

    let intent = state
        .provider
        .create_payment_intent(amount_cents, &currency)
        .await
        .map_err(payment_error_to_response)?;

    info!(
        "Created payment intent {} for {} {}",
        intent.intent_id, amount_cents, currency
    );

    Ok(Json(CreatePaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}

/// Handle the provider webhook.
///
/// Order matters: signature header presence, verification against the raw
/// body, atomic dedup claim, dispatch, acknowledgement. A dispatch failure
/// releases the claim so the provider's redelivery is reprocessed.
#[instrument(skip(state, headers, body))]
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, HandlerError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            warn!("Webhook rejected: missing stripe-signature header");
            bad_request("Missing signature")
        })?;

    let event = state
        .provider
        .verify_webhook(&body, signature)
        .await
        .map_err(payment_error_to_response)?;

    if !state.processed_events.claim(&event.event_id) {
        info!("Event {} already processed, skipping", event.event_id);
        return Ok(Json(WebhookAck {
            received: true,
            duplicate: Some(true),
        }));
    }

    info!(
        "Received event {} of type {}",
        event.event_id,
        event.event_type.as_tag()
    );

    if let Err(e) = dispatch_event(state.fulfillment.as_ref(), &event) {
        // Leave the event unclaimed so redelivery retries the dispatch.
        state.processed_events.release(&event.event_id);
        return Err(payment_error_to_response(e));
    }

    Ok(Json(WebhookAck {
        received: true,
        duplicate: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_shape() {
        let err = ErrorResponse::new("Test error");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Test error" }));
    }

    #[test]
    fn test_payment_error_conversion() {
        let err = PaymentError::InvalidRequest("Bad data".to_string());
        let (status, _json) = payment_error_to_response(err);
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let err = PaymentError::ProviderError {
            provider: "stripe".into(),
            message: "internal detail".into(),
        };
        let (status, Json(body)) = payment_error_to_response(err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Internal server error");
    }

    #[test]
    fn test_duplicate_ack_shape() {
        let ack = WebhookAck {
            received: true,
            duplicate: Some(true),
        };
        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(json, serde_json::json!({ "received": true, "duplicate": true }));

        let ack = WebhookAck {
            received: true,
            duplicate: None,
        };
        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(json, serde_json::json!({ "received": true }));
    }
}
