use error_common::{codes, Categorized, ErrorCategory};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BillingError {
    #[error("Payment amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("Payment of {amount} exceeds the remaining balance of {remaining}")]
    ExceedsRemaining { amount: Decimal, remaining: Decimal },

    #[error("Payment of {0} would overflow the account total")]
    AmountOutOfRange(Decimal),

    #[error("Care total must be positive, got {0}")]
    InvalidCareTotal(Decimal),
}

impl Categorized for BillingError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Validation
    }

    fn code(&self) -> &'static str {
        match self {
            BillingError::NonPositiveAmount(_) => codes::validation::NON_POSITIVE_AMOUNT,
            BillingError::ExceedsRemaining { .. } => codes::validation::AMOUNT_EXCEEDS_REMAINING,
            BillingError::AmountOutOfRange(_) => codes::validation::AMOUNT_OUT_OF_RANGE,
            BillingError::InvalidCareTotal(_) => codes::validation::INVALID_INPUT,
        }
    }
}

pub type BillingResult<T> = Result<T, BillingError>;
