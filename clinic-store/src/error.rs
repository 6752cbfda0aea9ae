use billing_service::BillingError;
use error_common::{codes, Categorized, ErrorCategory};
use rust_decimal::Decimal;
use scheduling_service::{ConflictCheck, SchedulingError};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Kind of record a lookup failed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Patient,
    Appointment,
    Doctor,
    Receptionist,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Patient => "Patient",
            EntityKind::Appointment => "Appointment",
            EntityKind::Doctor => "Doctor",
            EntityKind::Receptionist => "Receptionist",
        })
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Billing(#[from] BillingError),

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error("No care selected for this patient")]
    NoCareSelected,

    #[error("Outstanding balance: {remaining} {currency}")]
    BalanceOutstanding { remaining: Decimal, currency: String },

    #[error("Care total is already locked for this patient")]
    CareAlreadyLocked,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Scheduling conflict: {0}")]
    Conflict(Box<ConflictCheck>),

    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: Uuid },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Credential hashing failed: {0}")]
    Hashing(String),

    #[error("Failed to read snapshot: {0}")]
    SnapshotRead(#[source] std::io::Error),

    #[error("Failed to write snapshot: {0}")]
    SnapshotWrite(#[source] std::io::Error),

    #[error("Snapshot is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    pub fn not_found(entity: EntityKind, id: Uuid) -> Self {
        StoreError::NotFound { entity, id }
    }

    pub fn conflict(check: ConflictCheck) -> Self {
        StoreError::Conflict(Box::new(check))
    }

    /// The rejected conflict, if this is a scheduling conflict
    pub fn conflict_check(&self) -> Option<&ConflictCheck> {
        match self {
            StoreError::Conflict(check) => Some(check),
            _ => None,
        }
    }
}

impl Categorized for StoreError {
    fn category(&self) -> ErrorCategory {
        match self {
            StoreError::Validation(_) => ErrorCategory::Validation,
            StoreError::Billing(e) => e.category(),
            StoreError::Scheduling(e) => e.category(),
            StoreError::NoCareSelected
            | StoreError::BalanceOutstanding { .. }
            | StoreError::CareAlreadyLocked
            | StoreError::InvalidState(_) => ErrorCategory::Precondition,
            StoreError::Conflict(_) => ErrorCategory::Conflict,
            StoreError::NotFound { .. } => ErrorCategory::NotFound,
            StoreError::InvalidCredentials => ErrorCategory::Validation,
            StoreError::Hashing(_) => ErrorCategory::Internal,
            StoreError::SnapshotRead(_) | StoreError::SnapshotWrite(_) | StoreError::Corrupt(_) => {
                ErrorCategory::Persistence
            }
            StoreError::Config(_) => ErrorCategory::Configuration,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            StoreError::Validation(_) | StoreError::InvalidCredentials => {
                codes::validation::INVALID_INPUT
            }
            StoreError::Billing(e) => e.code(),
            StoreError::Scheduling(e) => e.code(),
            StoreError::NoCareSelected => codes::precondition::NO_CARE_SELECTED,
            StoreError::BalanceOutstanding { .. } => codes::precondition::BALANCE_OUTSTANDING,
            StoreError::CareAlreadyLocked => codes::precondition::CARE_ALREADY_LOCKED,
            StoreError::InvalidState(_) => codes::precondition::INVALID_STATE,
            StoreError::Conflict(check) => {
                if check.conflicting_appointment.is_some() {
                    codes::conflict::DOUBLE_BOOKING
                } else {
                    codes::conflict::OUTSIDE_CLINIC_HOURS
                }
            }
            StoreError::NotFound { entity, .. } => match entity {
                EntityKind::Patient => codes::not_found::PATIENT,
                EntityKind::Appointment => codes::not_found::APPOINTMENT,
                EntityKind::Doctor => codes::not_found::DOCTOR,
                EntityKind::Receptionist => codes::not_found::RECEPTIONIST,
            },
            StoreError::Hashing(_) => codes::system::CREDENTIAL_HASHING,
            StoreError::SnapshotRead(_) => codes::persistence::SNAPSHOT_READ_FAILED,
            StoreError::SnapshotWrite(_) => codes::persistence::SNAPSHOT_WRITE_FAILED,
            StoreError::Corrupt(_) => codes::persistence::SNAPSHOT_CORRUPT,
            StoreError::Config(_) => codes::system::CONFIGURATION,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
