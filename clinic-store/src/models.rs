use audit_engine::{ActorRole, AppendOnlyLog};
use billing_service::{BalanceSummary, Payment};
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use scheduling_service::{AppointmentConfirmation, CareType};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Treatment status of a patient
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatientStatus {
    #[default]
    New,
    InTreatment,
    Completed,
    Cancelled,
    NoShow,
}

impl PatientStatus {
    pub const ALL: [PatientStatus; 5] = [
        PatientStatus::New,
        PatientStatus::InTreatment,
        PatientStatus::Completed,
        PatientStatus::Cancelled,
        PatientStatus::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatientStatus::New => "NEW",
            PatientStatus::InTreatment => "IN_TREATMENT",
            PatientStatus::Completed => "COMPLETED",
            PatientStatus::Cancelled => "CANCELLED",
            PatientStatus::NoShow => "NO_SHOW",
        }
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded status transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub id: Uuid,
    pub previous_status: PatientStatus,
    pub new_status: PatientStatus,
    pub changed_at: DateTime<Utc>,
    pub changed_by: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Whether the patient agreed to reminders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationConsent {
    #[default]
    Unasked,
    Granted,
    Declined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub doctor_id: Uuid,

    pub status: PatientStatus,
    pub status_history: AppendOnlyLog<StatusHistoryEntry>,

    pub care_type: Option<CareType>,
    pub care_total: Decimal,
    pub care_total_locked: bool,

    pub payments: Vec<Payment>,

    #[serde(default)]
    pub next_appointment_id: Option<Uuid>,
    #[serde(default)]
    pub notification_consent: NotificationConsent,
    #[serde(default)]
    pub is_deleted: bool,
    /// Doctor-only free text, never copied into audit details
    #[serde(default)]
    pub medical_notes: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    pub fn balance(&self) -> BalanceSummary {
        billing_service::summarize(self.care_total, &self.payments)
    }

    pub fn remaining(&self) -> Decimal {
        billing_service::remaining(self.care_total, &self.payments)
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Move to `new_status`, appending the transition to the history
    pub(crate) fn transition(
        &mut self,
        new_status: PatientStatus,
        changed_by: Uuid,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> &StatusHistoryEntry {
        let previous_status = self.status;
        self.status = new_status;
        self.updated_at = now;
        self.status_history.push(StatusHistoryEntry {
            id: Uuid::new_v4(),
            previous_status,
            new_status,
            changed_at: now,
            changed_by,
            reason,
        })
    }
}

/// Doctor or receptionist account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

pub type Doctor = StaffMember;
pub type Receptionist = StaffMember;

/// Who performs an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub name: String,
    pub role: ActorRole,
}

impl Actor {
    pub fn new(id: Uuid, name: impl Into<String>, role: ActorRole) -> Self {
        Self {
            id,
            name: name.into(),
            role,
        }
    }

    pub fn owner(id: Uuid, name: impl Into<String>) -> Self {
        Self::new(id, name, ActorRole::Owner)
    }

    pub fn doctor(doctor: &Doctor) -> Self {
        Self::new(doctor.id, doctor.name.clone(), ActorRole::Doctor)
    }

    pub fn receptionist(receptionist: &Receptionist) -> Self {
        Self::new(receptionist.id, receptionist.name.clone(), ActorRole::Receptionist)
    }

    pub fn system() -> Self {
        Self::new(Uuid::nil(), "System", ActorRole::System)
    }

    pub fn is_owner(&self) -> bool {
        self.role == ActorRole::Owner
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatient {
    pub name: String,
    pub phone: String,
    pub doctor_id: Uuid,
    pub notification_consent: NotificationConsent,
}

/// Partial patient edit; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub doctor_id: Option<Uuid>,
    pub notification_consent: Option<NotificationConsent>,
    /// `Some(None)` clears the link
    pub next_appointment_id: Option<Option<Uuid>>,
}

impl PatientUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.doctor_id.is_none()
            && self.notification_consent.is_none()
            && self.next_appointment_id.is_none()
    }
}

/// Registration input; the plaintext password only lives here
pub struct NewStaffMember {
    pub name: String,
    pub phone: String,
    pub password: SecretString,
}

#[derive(Default)]
pub struct StaffUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub password: Option<SecretString>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub start: NaiveDateTime,
    /// Defaults to the care type's usual duration
    pub duration_minutes: Option<u32>,
    pub care_type: CareType,
    pub confirmation: AppointmentConfirmation,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentUpdate {
    pub doctor_id: Option<Uuid>,
    pub start: Option<NaiveDateTime>,
    pub duration_minutes: Option<u32>,
    pub care_type: Option<CareType>,
    pub confirmation: Option<AppointmentConfirmation>,
    pub completed: Option<bool>,
    /// `Some(None)` clears the notes
    pub notes: Option<Option<String>>,
}

impl AppointmentUpdate {
    /// Touches start, length or doctor, so the booking must be re-checked
    pub fn changes_timing(&self) -> bool {
        self.doctor_id.is_some() || self.start.is_some() || self.duration_minutes.is_some()
    }
}

/// Which role a credential check should look up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Doctor,
    Receptionist,
}

impl From<StaffRole> for ActorRole {
    fn from(role: StaffRole) -> Self {
        match role {
            StaffRole::Doctor => ActorRole::Doctor,
            StaffRole::Receptionist => ActorRole::Receptionist,
        }
    }
}
