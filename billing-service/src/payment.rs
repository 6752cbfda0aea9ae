use crate::error::{BillingError, BillingResult};
use crate::models::{BalanceSummary, Payment, PaymentStatus};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

/// Sum of every payment amount, saturating at `Decimal::MAX`
pub fn total_paid(payments: &[Payment]) -> Decimal {
    payments
        .iter()
        .fold(Decimal::ZERO, |total, p| total.saturating_add(p.amount))
}

fn checked_total(payments: &[Payment]) -> Option<Decimal> {
    payments
        .iter()
        .try_fold(Decimal::ZERO, |total, p| total.checked_add(p.amount))
}

/// Outstanding balance, never negative
pub fn remaining(care_total: Decimal, payments: &[Payment]) -> Decimal {
    (care_total - total_paid(payments)).max(Decimal::ZERO)
}

/// Share of the care total already paid, rounded half away from zero.
/// Zero when no care total has been agreed yet.
pub fn paid_percentage(care_total: Decimal, payments: &[Payment]) -> u32 {
    if care_total.is_zero() {
        return 0;
    }

    total_paid(payments)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(care_total))
        .map(|ratio| ratio.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|ratio| ratio.to_u32())
        .unwrap_or(0)
}

pub fn payment_status(care_total: Decimal, payments: &[Payment]) -> PaymentStatus {
    let paid = total_paid(payments);
    if paid.is_zero() {
        PaymentStatus::Unpaid
    } else if paid >= care_total {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Partial
    }
}

pub fn summarize(care_total: Decimal, payments: &[Payment]) -> BalanceSummary {
    BalanceSummary {
        care_total,
        total_paid: total_paid(payments),
        remaining: remaining(care_total, payments),
        paid_percentage: paid_percentage(care_total, payments),
        status: payment_status(care_total, payments),
    }
}

/// Validates and records payments against one account
#[derive(Debug, Clone, Copy)]
pub struct PaymentProcessor {
    /// Reject payments larger than the remaining balance
    pub enforce_ceiling: bool,
}

impl PaymentProcessor {
    pub fn new(enforce_ceiling: bool) -> Self {
        Self { enforce_ceiling }
    }

    /// Check a prospective payment without touching the account
    pub fn validate(
        &self,
        care_total: Decimal,
        payments: &[Payment],
        amount: Decimal,
    ) -> BillingResult<()> {
        if amount <= Decimal::ZERO {
            return Err(BillingError::NonPositiveAmount(amount));
        }

        if checked_total(payments)
            .and_then(|total| total.checked_add(amount))
            .is_none()
        {
            return Err(BillingError::AmountOutOfRange(amount));
        }

        if self.enforce_ceiling {
            let remaining = remaining(care_total, payments);
            if amount > remaining {
                return Err(BillingError::ExceedsRemaining { amount, remaining });
            }
        }

        Ok(())
    }

    /// Validate then append a new payment, returning the stored record
    pub fn record<'a>(
        &self,
        care_total: Decimal,
        payments: &'a mut Vec<Payment>,
        amount: Decimal,
        recorded_by: Uuid,
    ) -> BillingResult<&'a Payment> {
        self.validate(care_total, payments, amount)?;

        payments.push(Payment::new(amount, recorded_by));
        let payment = &payments[payments.len() - 1];

        tracing::debug!(
            payment_id = %payment.id,
            amount = %amount,
            recorded_by = %recorded_by,
            "Payment recorded"
        );

        Ok(payment)
    }
}

impl Default for PaymentProcessor {
    fn default() -> Self {
        Self::new(true)
    }
}

/// A care total must be strictly positive before it can be locked
pub fn validate_care_total(care_total: Decimal) -> BillingResult<()> {
    if care_total <= Decimal::ZERO {
        return Err(BillingError::InvalidCareTotal(care_total));
    }
    Ok(())
}
