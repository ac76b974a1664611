//! # Stripe Webhook Verification
//!
//! Signature verification and event parsing for Stripe webhooks, following
//! Stripe's signed-payload scheme: the `Stripe-Signature` header carries a
//! timestamp and one or more HMAC-SHA256 signatures over `"{t}.{body}"`.

use checkout_core::{PaymentError, PaymentResult, WebhookEvent, WebhookEventType};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

/// Replay-protection window for the signature timestamp (seconds)
const TIMESTAMP_TOLERANCE_SECS: i64 = 300;

/// Verify a raw webhook payload against the signing secret and parse it.
pub fn verify_and_parse(
    payload: &[u8],
    signature: &str,
    webhook_secret: &str,
) -> PaymentResult<WebhookEvent> {
    let sig_parts = parse_signature_header(signature)?;

    let timestamp = sig_parts.timestamp;
    let now = Utc::now().timestamp();

    if (now - timestamp).abs() > TIMESTAMP_TOLERANCE_SECS {
        return Err(PaymentError::WebhookVerificationFailed(
            "Timestamp outside tolerance".to_string(),
        ));
    }

    let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
    let expected_sig = compute_hmac_sha256(webhook_secret, &signed_payload);

    let valid = sig_parts
        .signatures
        .iter()
        .any(|sig| constant_time_compare(sig, &expected_sig));

    if !valid {
        return Err(PaymentError::WebhookVerificationFailed(
            "Signature mismatch".to_string(),
        ));
    }

    parse_event(payload)
}

/// Parse a verified payload into a `WebhookEvent`
fn parse_event(payload: &[u8]) -> PaymentResult<WebhookEvent> {
    let event: StripeWebhookEvent = serde_json::from_slice(payload)
        .map_err(|e| PaymentError::WebhookParseError(format!("Failed to parse webhook: {}", e)))?;

    debug!(event_type = %event.event_type, event_id = %event.id, "Verified Stripe webhook");

    let event_type = match event.event_type.as_str() {
        "checkout.session.completed" => WebhookEventType::CheckoutCompleted,
        "payment_intent.succeeded" => WebhookEventType::PaymentIntentSucceeded,
        other => WebhookEventType::Unknown(other.to_string()),
    };

    let object = &event.data.object;

    // Checkout sessions report `amount_total`, payment intents `amount`.
    let amount = object
        .get("amount_total")
        .or_else(|| object.get("amount"))
        .and_then(|v| v.as_i64());

    let session_id = match event_type {
        WebhookEventType::CheckoutCompleted => {
            object.get("id").and_then(|v| v.as_str()).map(String::from)
        }
        _ => None,
    };

    let payment_intent_id = match event_type {
        WebhookEventType::PaymentIntentSucceeded => {
            object.get("id").and_then(|v| v.as_str()).map(String::from)
        }
        _ => object
            .get("payment_intent")
            .and_then(|v| v.as_str())
            .map(String::from),
    };

    let currency = object
        .get("currency")
        .and_then(|v| v.as_str())
        .map(String::from);

    // Sessions carry `payment_status`, intents `status`.
    let payment_status = object
        .get("payment_status")
        .or_else(|| object.get("status"))
        .and_then(|v| v.as_str())
        .map(String::from);

    Ok(WebhookEvent {
        event_id: event.id,
        event_type,
        provider: "stripe".to_string(),
        session_id,
        payment_intent_id,
        amount,
        currency,
        payment_status,
        raw_data: Some(serde_json::Value::Object(event.data.object)),
        timestamp: DateTime::from_timestamp(event.created, 0).unwrap_or_else(Utc::now),
    })
}

#[derive(Debug, Deserialize)]
struct StripeWebhookEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    created: i64,
    data: StripeEventData,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: serde_json::Map<String, serde_json::Value>,
}

struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<String>,
}

fn parse_signature_header(header: &str) -> PaymentResult<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let kv: Vec<&str> = part.split('=').collect();
        if kv.len() != 2 {
            continue;
        }
        match kv[0] {
            "t" => {
                timestamp = kv[1].parse().ok();
            }
            "v1" => {
                signatures.push(kv[1].to_string());
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        PaymentError::WebhookVerificationFailed("Missing timestamp in signature".to_string())
    })?;

    if signatures.is_empty() {
        return Err(PaymentError::WebhookVerificationFailed(
            "No v1 signature found".to_string(),
        ));
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

fn compute_hmac_sha256(secret: &str, message: &str) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    let result = mac.finalize();
    hex::encode(result.into_bytes())
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Build a valid `Stripe-Signature` header for a payload (test support)
#[cfg(any(test, feature = "test-signing"))]
pub fn sign_payload(payload: &[u8], webhook_secret: &str, timestamp: i64) -> String {
    let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
    let sig = compute_hmac_sha256(webhook_secret, &signed_payload);
    format!("t={},v1={}", timestamp, sig)
}
