//! Common error handling utilities for the clinic core
//!
//! Every crate in the workspace owns its own `thiserror` enum. This crate
//! provides the vocabulary those enums share so that callers (and log lines)
//! can reason about a failure without knowing which crate produced it.
//!
//! # Error Categories
//!
//! - **Validation**: bad input shape or range, rejected before any mutation
//! - **Precondition**: a business rule is unmet (balance due, no care assigned)
//! - **Conflict**: scheduling overlap or clinic-hours violation
//! - **NotFound**: a referenced patient, appointment or staff member is absent
//! - **Persistence**: snapshot load/save failures
//! - **Configuration**: invalid clinic configuration
//! - **Internal**: anything else (hashing failures, invariant breaks)
//!
//! # Example
//!
//! ```rust
//! use error_common::{Categorized, ErrorCategory, codes};
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("Validation error: {0}")]
//! struct AmountError(String);
//!
//! impl Categorized for AmountError {
//!     fn category(&self) -> ErrorCategory {
//!         ErrorCategory::Validation
//!     }
//!
//!     fn code(&self) -> &'static str {
//!         codes::validation::NON_POSITIVE_AMOUNT
//!     }
//! }
//!
//! let err = AmountError("amount must be positive".into());
//! assert!(err.is_recoverable());
//! error_common::log_error("add_payment", &err);
//! ```

pub mod types;
pub mod codes;

pub use types::*;
pub use codes::*;
