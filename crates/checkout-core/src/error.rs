//! # Payment Error Types
//!
//! Typed error handling for the checkout gateway.
//! All payment operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data (missing fields, malformed body)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Amount outside configured bounds
    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Webhook signature verification failed
    #[error("Webhook verification failed: {0}")]
    WebhookVerificationFailed(String),

    /// Webhook payload parsing error
    #[error("Webhook parse error: {0}")]
    WebhookParseError(String),

    /// Fulfillment dispatch failed after verification
    #[error("Fulfillment error: {0}")]
    FulfillmentFailed(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::InvalidAmount { .. } => 400,
            PaymentError::ProviderError { .. } => 500,
            PaymentError::NetworkError(_) => 500,
            PaymentError::WebhookVerificationFailed(_) => 400,
            PaymentError::WebhookParseError(_) => 400,
            PaymentError::FulfillmentFailed(_) => 500,
            PaymentError::Internal(_) => 500,
            PaymentError::Serialization(_) => 500,
        }
    }

    /// Message safe to surface to HTTP clients.
    ///
    /// Validation errors are descriptive; provider, network and internal
    /// failures are collapsed to a generic message so provider error
    /// internals never leak. Signature failures stay deliberately vague.
    pub fn public_message(&self) -> String {
        match self {
            PaymentError::InvalidRequest(_) | PaymentError::InvalidAmount { .. } => {
                self.to_string()
            }
            PaymentError::WebhookVerificationFailed(_) => {
                "Webhook signature verification failed".to_string()
            }
            PaymentError::WebhookParseError(_) => "Malformed webhook payload".to_string(),
            PaymentError::Configuration(_) => "Server configuration error".to_string(),
            PaymentError::FulfillmentFailed(_) => "Webhook processing failed".to_string(),
            PaymentError::ProviderError { .. }
            | PaymentError::NetworkError(_)
            | PaymentError::Internal(_)
            | PaymentError::Serialization(_) => "Internal server error".to_string(),
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
