// Audit entry types and structures
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// Closed set of auditable actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditActionType {
    PatientCreated,
    PatientUpdated,
    PatientDeleted,
    PatientRestored,
    StatusChanged,
    PaymentAdded,
    CareAssigned,
    AppointmentScheduled,
    AppointmentChanged,
    AppointmentCancelled,
    AppointmentConfirmed,
    CompletedOverride,
    SchedulingOverride,
}

impl AuditActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditActionType::PatientCreated => "PATIENT_CREATED",
            AuditActionType::PatientUpdated => "PATIENT_UPDATED",
            AuditActionType::PatientDeleted => "PATIENT_DELETED",
            AuditActionType::PatientRestored => "PATIENT_RESTORED",
            AuditActionType::StatusChanged => "STATUS_CHANGED",
            AuditActionType::PaymentAdded => "PAYMENT_ADDED",
            AuditActionType::CareAssigned => "CARE_ASSIGNED",
            AuditActionType::AppointmentScheduled => "APPOINTMENT_SCHEDULED",
            AuditActionType::AppointmentChanged => "APPOINTMENT_CHANGED",
            AuditActionType::AppointmentCancelled => "APPOINTMENT_CANCELLED",
            AuditActionType::AppointmentConfirmed => "APPOINTMENT_CONFIRMED",
            AuditActionType::CompletedOverride => "COMPLETED_OVERRIDE",
            AuditActionType::SchedulingOverride => "SCHEDULING_OVERRIDE",
        }
    }

    /// Overrides bypass a normally enforced rule and deserve attention in reviews
    pub fn is_override(&self) -> bool {
        matches!(
            self,
            AuditActionType::CompletedOverride | AuditActionType::SchedulingOverride
        )
    }
}

impl fmt::Display for AuditActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who performed an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Owner,
    Doctor,
    Receptionist,
    Patient,
    System,
}

impl ActorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorRole::Owner => "owner",
            ActorRole::Doctor => "doctor",
            ActorRole::Receptionist => "receptionist",
            ActorRole::Patient => "patient",
            ActorRole::System => "system",
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied part of an audit entry; id, timestamp and hashes are
/// assigned by the trail.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEntry {
    pub action_type: AuditActionType,
    pub actor_role: ActorRole,
    pub actor_id: Uuid,
    pub actor_name: String,
    pub patient_id: Option<Uuid>,
    pub patient_name: Option<String>,
    pub details: String,
    pub metadata: Option<serde_json::Value>,
}

impl NewAuditEntry {
    pub fn new(
        action_type: AuditActionType,
        actor_role: ActorRole,
        actor_id: Uuid,
        actor_name: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            action_type,
            actor_role,
            actor_id,
            actor_name: actor_name.into(),
            patient_id: None,
            patient_name: None,
            details: details.into(),
            metadata: None,
        }
    }

    pub fn with_patient(mut self, patient_id: Uuid, patient_name: impl Into<String>) -> Self {
        self.patient_id = Some(patient_id);
        self.patient_name = Some(patient_name.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A recorded, immutable audit entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub action_type: AuditActionType,
    pub actor_role: ActorRole,
    pub actor_id: Uuid,
    pub actor_name: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    /// Hash of the previous entry ("0" for the first one)
    pub prev_hash: String,
    /// Hash of this entry
    pub entry_hash: String,
}

impl AuditLogEntry {
    pub(crate) fn seal(
        new: NewAuditEntry,
        id: Uuid,
        timestamp: DateTime<Utc>,
        prev_hash: String,
    ) -> Self {
        let mut entry = Self {
            id,
            action_type: new.action_type,
            actor_role: new.actor_role,
            actor_id: new.actor_id,
            actor_name: new.actor_name,
            timestamp,
            patient_id: new.patient_id,
            patient_name: new.patient_name,
            details: new.details,
            metadata: new.metadata,
            prev_hash,
            entry_hash: String::new(),
        };
        entry.entry_hash = entry.calculate_hash();
        entry
    }

    /// SHA-256 over every field except `entry_hash` itself
    pub fn calculate_hash(&self) -> String {
        let mut hasher = Sha256::new();

        hasher.update(self.id.as_bytes());
        hasher.update(self.action_type.as_str().as_bytes());
        hasher.update(self.actor_role.as_str().as_bytes());
        hasher.update(self.actor_id.as_bytes());
        hasher.update(self.actor_name.as_bytes());
        hasher.update(self.timestamp.to_rfc3339().as_bytes());
        if let Some(patient_id) = self.patient_id {
            hasher.update(patient_id.as_bytes());
        }
        if let Some(patient_name) = &self.patient_name {
            hasher.update(patient_name.as_bytes());
        }
        hasher.update(self.details.as_bytes());
        if let Some(metadata) = &self.metadata {
            hasher.update(metadata.to_string().as_bytes());
        }
        hasher.update(self.prev_hash.as_bytes());

        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_type_wire_names() {
        let json = serde_json::to_string(&AuditActionType::CompletedOverride).unwrap();
        assert_eq!(json, "\"COMPLETED_OVERRIDE\"");
        assert_eq!(AuditActionType::SchedulingOverride.to_string(), "SCHEDULING_OVERRIDE");
    }

    #[test]
    fn test_actor_role_wire_names() {
        let json = serde_json::to_string(&ActorRole::Receptionist).unwrap();
        assert_eq!(json, "\"receptionist\"");
    }

    #[test]
    fn test_hash_covers_details_and_metadata() {
        let new = NewAuditEntry::new(
            AuditActionType::CompletedOverride,
            ActorRole::Owner,
            Uuid::new_v4(),
            "Owner",
            "Completion forced with 20000 DA outstanding",
        )
        .with_metadata(json!({"outstanding": "20000"}));

        let entry = AuditLogEntry::seal(new, Uuid::new_v4(), Utc::now(), "0".to_string());
        assert_eq!(entry.entry_hash, entry.calculate_hash());

        let mut edited = entry.clone();
        edited.details = "Completion forced".to_string();
        assert_ne!(edited.calculate_hash(), entry.entry_hash);

        let mut edited = entry.clone();
        edited.metadata = Some(json!({"outstanding": "0"}));
        assert_ne!(edited.calculate_hash(), entry.entry_hash);
    }
}
