// Filtering for the owner's audit view
use crate::entry::{AuditActionType, AuditLogEntry};
use crate::trail::AuditTrail;
use uuid::Uuid;

/// Builder-style audit query; every filter left unset matches everything.
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    text: Option<String>,
    action_type: Option<AuditActionType>,
    patient_id: Option<Uuid>,
    actor_id: Option<Uuid>,
    overrides_only: bool,
    limit: Option<usize>,
}

impl AuditQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive match on patient name, actor name or details
    pub fn text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text = if text.trim().is_empty() {
            None
        } else {
            Some(text.to_lowercase())
        };
        self
    }

    pub fn action_type(mut self, action_type: AuditActionType) -> Self {
        self.action_type = Some(action_type);
        self
    }

    pub fn patient(mut self, patient_id: Uuid) -> Self {
        self.patient_id = Some(patient_id);
        self
    }

    pub fn actor(mut self, actor_id: Uuid) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    pub fn overrides_only(mut self) -> Self {
        self.overrides_only = true;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        if let Some(action_type) = self.action_type {
            if entry.action_type != action_type {
                return false;
            }
        }

        if self.overrides_only && !entry.action_type.is_override() {
            return false;
        }

        if let Some(patient_id) = self.patient_id {
            if entry.patient_id != Some(patient_id) {
                return false;
            }
        }

        if let Some(actor_id) = self.actor_id {
            if entry.actor_id != actor_id {
                return false;
            }
        }

        if let Some(ref needle) = self.text {
            let in_patient = entry
                .patient_name
                .as_ref()
                .map(|name| name.to_lowercase().contains(needle))
                .unwrap_or(false);
            let in_actor = entry.actor_name.to_lowercase().contains(needle);
            let in_details = entry.details.to_lowercase().contains(needle);

            if !(in_patient || in_actor || in_details) {
                return false;
            }
        }

        true
    }

    /// Matching entries, newest first
    pub fn execute<'a>(&self, trail: &'a AuditTrail) -> Vec<&'a AuditLogEntry> {
        let matching = trail.newest_first().filter(|entry| self.matches(entry));

        match self.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }
}
