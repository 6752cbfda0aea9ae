use error_common::{codes, Categorized, ErrorCategory};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid redaction pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Logger initialization failed: {0}")]
    Init(String),
}

impl Categorized for LoggerError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }

    fn code(&self) -> &'static str {
        codes::system::CONFIGURATION
    }
}

pub type LoggerResult<T> = Result<T, LoggerError>;
