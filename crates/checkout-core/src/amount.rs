//! # Amount Validation
//!
//! Bounds checking for custom payment amounts in minor currency units.
//! Pure functions, no side effects.

use crate::error::{PaymentError, PaymentResult};

/// Default minimum charge: 50 cents (Stripe's own floor for most currencies)
pub const DEFAULT_MIN_AMOUNT_CENTS: i64 = 50;

/// Default maximum charge: 999999 cents
pub const DEFAULT_MAX_AMOUNT_CENTS: i64 = 999_999;

/// Configured amount bounds, in minor currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountLimits {
    pub min_cents: i64,
    pub max_cents: i64,
}

impl AmountLimits {
    pub fn new(min_cents: i64, max_cents: i64) -> Self {
        Self {
            min_cents,
            max_cents,
        }
    }

    /// Load limits from `MIN_CUSTOM_AMOUNT_CENTS` / `MAX_CUSTOM_AMOUNT_CENTS`,
    /// falling back to the defaults when unset or unparseable.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let min_cents = std::env::var("MIN_CUSTOM_AMOUNT_CENTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MIN_AMOUNT_CENTS);

        let max_cents = std::env::var("MAX_CUSTOM_AMOUNT_CENTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_AMOUNT_CENTS);

        Self {
            min_cents,
            max_cents,
        }
    }
}

impl Default for AmountLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_AMOUNT_CENTS, DEFAULT_MAX_AMOUNT_CENTS)
    }
}

/// Validate an amount against the configured bounds.
///
/// Valid iff `min_cents <= amount_cents <= max_cents`. Non-integer amounts
/// never reach this function: the HTTP layer rejects them at
/// deserialization since the field is typed `i64`.
pub fn validate_amount(amount_cents: i64, limits: &AmountLimits) -> PaymentResult<()> {
    if amount_cents < limits.min_cents {
        return Err(PaymentError::InvalidAmount {
            message: format!("Amount must be at least {} cents", limits.min_cents),
        });
    }

    if amount_cents > limits.max_cents {
        return Err(PaymentError::InvalidAmount {
            message: format!("Amount cannot exceed {} cents", limits.max_cents),
        });
    }

    Ok(())
}
