//! # Stripe Provider
//!
//! `PaymentProvider` implementation over Stripe's form-encoded REST API.
//! Checkout sessions use Stripe's hosted page; payment intents return the
//! client secret the frontend needs to complete payment.

use crate::config::StripeConfig;
use crate::webhook;
use async_trait::async_trait;
use checkout_core::{
    CheckoutSessionParams, HostedCheckout, PaymentError, PaymentIntent, PaymentProvider,
    PaymentResult, WebhookEvent,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Stripe payment provider
pub struct StripeProvider {
    config: StripeConfig,
    client: Client,
}

impl StripeProvider {
    /// Create a new Stripe provider
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| PaymentError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    async fn post_form(
        &self,
        path: &str,
        form_params: &[(String, String)],
        idempotency_key: &str,
    ) -> PaymentResult<String> {
        let url = format!("{}{}", self.config.api_base_url, path);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", idempotency_key)
            .form(form_params)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(PaymentError::ProviderError {
                    provider: "stripe".to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(PaymentError::ProviderError {
                provider: "stripe".to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    #[instrument(skip(self, params), fields(amount_cents = params.amount_cents))]
    async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> PaymentResult<HostedCheckout> {
        let currency = params.currency.to_lowercase();
        let description = format!(
            "Payment of {:.2} {}",
            params.amount_cents as f64 / 100.0,
            params.currency.to_uppercase()
        );

        debug!("Creating Stripe checkout session: {}", description);

        // Single ad-hoc line item; there is no product catalog here.
        let form_params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), params.success_url.clone()),
            ("cancel_url".to_string(), params.cancel_url.clone()),
            (
                "payment_method_types[0]".to_string(),
                "card".to_string(),
            ),
            (
                "line_items[0][price_data][currency]".to_string(),
                currency,
            ),
            (
                "line_items[0][price_data][unit_amount]".to_string(),
                params.amount_cents.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                "Custom Payment".to_string(),
            ),
            (
                "line_items[0][price_data][product_data][description]".to_string(),
                description,
            ),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
        ];

        let idempotency_key = params
            .idempotency_key
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let body = self
            .post_form("/v1/checkout/sessions", &form_params, &idempotency_key)
            .await?;

        let session: StripeCheckoutSessionResponse = serde_json::from_str(&body)
            .map_err(|e| PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e)))?;

        info!(
            "Created Stripe checkout session: id={}, amount={} cents",
            session.id, params.amount_cents
        );

        Ok(HostedCheckout {
            session_id: session.id,
            checkout_url: session.url,
        })
    }

    #[instrument(skip(self))]
    async fn create_payment_intent(
        &self,
        amount_cents: i64,
        currency: &str,
    ) -> PaymentResult<PaymentIntent> {
        let form_params: Vec<(String, String)> = vec![
            ("amount".to_string(), amount_cents.to_string()),
            ("currency".to_string(), currency.to_lowercase()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];

        let idempotency_key = Uuid::new_v4().to_string();

        let body = self
            .post_form("/v1/payment_intents", &form_params, &idempotency_key)
            .await?;

        let intent: StripePaymentIntentResponse = serde_json::from_str(&body)
            .map_err(|e| PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e)))?;

        let client_secret = intent.client_secret.ok_or_else(|| {
            PaymentError::Serialization("Payment intent response missing client_secret".to_string())
        })?;

        info!(
            "Created Stripe payment intent: id={}, amount={} cents",
            intent.id, amount_cents
        );

        Ok(PaymentIntent {
            intent_id: intent.id,
            client_secret,
        })
    }

    #[instrument(skip(self, payload, signature))]
    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> PaymentResult<WebhookEvent> {
        // Fail closed: no secret, no verification, no processing.
        let secret = self.config.webhook_secret.as_deref().ok_or_else(|| {
            PaymentError::Configuration("STRIPE_WEBHOOK_SECRET not configured".to_string())
        })?;

        webhook::verify_and_parse(payload, signature, secret)
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }
}

// =============================================================================
// Stripe API response types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct StripePaymentIntentResponse {
    id: String,
    #[serde(default)]
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer, webhook_secret: Option<String>) -> StripeProvider {
        let config =
            StripeConfig::new("sk_test_abc123", webhook_secret).with_api_base_url(server.uri());
        StripeProvider::new(config).unwrap()
    }

    fn checkout_params() -> CheckoutSessionParams {
        CheckoutSessionParams {
            amount_cents: 2900,
            currency: "USD".to_string(),
            success_url: "https://example.com/success".to_string(),
            cancel_url: "https://example.com/cancel".to_string(),
            idempotency_key: None,
        }
    }

    #[tokio::test]
    async fn test_create_checkout_session() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .and(header("Authorization", "Bearer sk_test_abc123"))
            .and(body_string_contains("mode=payment"))
            .and(body_string_contains("unit_amount%5D=2900"))
            .and(body_string_contains("currency%5D=usd"))
            .and(body_string_contains("name%5D=Custom+Payment"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cs_test_123",
                "url": "https://checkout.stripe.com/c/pay/cs_test_123"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server, None);
        let session = provider
            .create_checkout_session(&checkout_params())
            .await
            .unwrap();

        assert_eq!(session.session_id, "cs_test_123");
        assert_eq!(
            session.checkout_url,
            "https://checkout.stripe.com/c/pay/cs_test_123"
        );
    }

    #[tokio::test]
    async fn test_checkout_session_provider_error_suppressed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "message": "Invalid currency: zzz", "type": "invalid_request_error" }
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server, None);
        let err = provider
            .create_checkout_session(&checkout_params())
            .await
            .unwrap_err();

        // Detail stays available for server-side logs, never for clients
        assert!(err.to_string().contains("Invalid currency"));
        assert_eq!(err.public_message(), "Internal server error");
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_create_payment_intent() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .and(body_string_contains("amount=9900"))
            .and(body_string_contains("currency=usd"))
            .and(body_string_contains("automatic_payment_methods%5Benabled%5D=true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pi_test_42",
                "client_secret": "pi_test_42_secret_xyz"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server, None);
        let intent = provider.create_payment_intent(9900, "USD").await.unwrap();

        assert_eq!(intent.intent_id, "pi_test_42");
        assert_eq!(intent.client_secret, "pi_test_42_secret_xyz");
    }

    #[tokio::test]
    async fn test_payment_intent_missing_client_secret() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "pi_test_42" })))
            .mount(&server)
            .await;

        let provider = provider_for(&server, None);
        let err = provider.create_payment_intent(9900, "usd").await.unwrap_err();

        assert!(matches!(err, PaymentError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_verify_webhook_fails_closed_without_secret() {
        let server = MockServer::start().await;
        let provider = provider_for(&server, None);

        let err = provider
            .verify_webhook(b"{}", "t=1,v1=abc")
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::Configuration(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_verify_webhook_with_secret() {
        let server = MockServer::start().await;
        let provider = provider_for(&server, Some("whsec_test".to_string()));

        let payload = json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "created": chrono::Utc::now().timestamp(),
            "data": { "object": { "id": "cs_1", "amount_total": 500, "currency": "usd" } }
        })
        .to_string()
        .into_bytes();
        let sig = crate::webhook::sign_payload(&payload, "whsec_test", chrono::Utc::now().timestamp());

        let event = provider.verify_webhook(&payload, &sig).await.unwrap();
        assert_eq!(event.event_id, "evt_1");
    }
}
