use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Single payment against a patient's care total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    /// Staff member who took the payment
    pub recorded_by: Uuid,
}

impl Payment {
    pub fn new(amount: Decimal, recorded_by: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            date: Utc::now(),
            recorded_by,
        }
    }
}

/// Payment progress of one patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "UNPAID",
            PaymentStatus::Partial => "PARTIAL",
            PaymentStatus::Paid => "PAID",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived view over a care total and its payments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub care_total: Decimal,
    pub total_paid: Decimal,
    pub remaining: Decimal,
    /// Rounded to the nearest whole percent, may exceed 100 when overpaid
    pub paid_percentage: u32,
    pub status: PaymentStatus,
}
