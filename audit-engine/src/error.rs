use error_common::{codes, Categorized, ErrorCategory};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    #[error("Audit chain broken at entry {entry_id} (position {position}): previous hash mismatch")]
    ChainBroken { entry_id: Uuid, position: usize },

    #[error("Audit entry {entry_id} (position {position}) does not match its recorded hash")]
    EntryTampered { entry_id: Uuid, position: usize },
}

impl Categorized for AuditError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Internal
    }

    fn code(&self) -> &'static str {
        codes::system::AUDIT_INTEGRITY
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
