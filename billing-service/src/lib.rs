//! Billing Service for the clinic core
//!
//! Every patient carries one agreed care total and an ordered list of
//! payments against it. This crate owns the arithmetic on top of that:
//! - Paid / remaining / percentage / payment status for a single patient
//! - Payment validation (positive amount, optional ceiling at the remaining balance)
//! - Clinic-wide revenue reporting for the owner dashboard
//!
//! All money is [`rust_decimal::Decimal`]; the remaining balance is floored
//! at zero so an overpaid account never shows a negative balance.

pub mod error;
pub mod models;
pub mod payment;
pub mod reporting;

pub use error::*;
pub use models::*;
pub use payment::*;
pub use reporting::*;
