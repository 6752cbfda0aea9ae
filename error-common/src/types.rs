use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad classification shared by every error enum in the workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Bad input shape or range
    Validation,
    /// Business rule unmet
    Precondition,
    /// Scheduling overlap or clinic-hours violation
    Conflict,
    /// Referenced entity is absent
    NotFound,
    /// Snapshot load/save failure
    Persistence,
    /// Invalid configuration
    Configuration,
    /// Internal system errors
    Internal,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Precondition => "precondition",
            ErrorCategory::Conflict => "conflict",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::Persistence => "persistence",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Internal => "internal",
        }
    }

    /// Business-rule failures the caller is expected to display and recover from
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            ErrorCategory::Validation
                | ErrorCategory::Precondition
                | ErrorCategory::Conflict
                | ErrorCategory::NotFound
        )
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every crate-level error enum
pub trait Categorized: std::error::Error {
    fn category(&self) -> ErrorCategory;

    /// Stable code from [`crate::codes`]
    fn code(&self) -> &'static str;

    /// None of the clinic errors are fatal; only persistence and internal
    /// failures hint that the process state may be degraded.
    fn is_recoverable(&self) -> bool {
        self.category().is_business_rule()
    }
}

/// Emit an error through tracing at a level matching its category
pub fn log_error<E: Categorized + ?Sized>(context: &str, error: &E) {
    let category = error.category();
    if category.is_business_rule() {
        tracing::warn!(
            context = context,
            error_category = %category,
            error_code = error.code(),
            error = %error,
            "Operation rejected"
        );
    } else {
        tracing::error!(
            context = context,
            error_category = %category,
            error_code = error.code(),
            error = %error,
            "Operation failed"
        );
    }
}
