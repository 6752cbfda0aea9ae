use error_common::{codes, Categorized, ErrorCategory};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulingError {
    #[error("Appointment duration must be at least one minute")]
    InvalidDuration,

    #[error("Invalid scheduling policy: {0}")]
    InvalidPolicy(String),
}

impl Categorized for SchedulingError {
    fn category(&self) -> ErrorCategory {
        match self {
            SchedulingError::InvalidDuration => ErrorCategory::Validation,
            SchedulingError::InvalidPolicy(_) => ErrorCategory::Configuration,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            SchedulingError::InvalidDuration => codes::validation::INVALID_DURATION,
            SchedulingError::InvalidPolicy(_) => codes::system::CONFIGURATION,
        }
    }
}

pub type SchedulingResult<T> = Result<T, SchedulingError>;
