//! Logging for the clinic core with automatic patient PII redaction
//!
//! Patient records carry phone numbers (and occasionally e-mail addresses in
//! free-text fields). Anything that reaches a log line goes through
//! [`PiiRedactor`] first so that operational logs never hold contact details.
//!
//! # Detected Data Types
//!
//! - **Phone Numbers**: `0555678901`, `0555 67 89 01`, `+213 555 67 89 01`
//! - **International numbers**: `+33612345678`
//! - **Email Addresses**: `user@example.com`
//! - **Custom Patterns**: configurable regex → replacement pairs
//!
//! Redacted values are replaced by a short SHA-256 digest by default so that
//! two log lines about the same number can still be correlated.
//!
//! # Example
//!
//! ```rust
//! use logger_redacted::{init_logging, redact, redacted_info, LoggerConfig};
//!
//! init_logging(&LoggerConfig::default()).ok();
//!
//! let line = redact("Reminder sent to 0555678901");
//! assert!(!line.contains("0555678901"));
//!
//! redacted_info!("Patient registered with phone {}", "0555678901");
//! ```

pub mod config;
pub mod error;
pub mod macros;
pub mod redactor;

pub use config::*;
pub use error::*;
pub use redactor::*;
