// Patient operations: registration, status machine, care and payments
use crate::error::{EntityKind, StoreError, StoreResult};
use crate::lifecycle::{check_care_assignment, check_completion};
use crate::models::{Actor, NewPatient, Patient, PatientStatus, PatientUpdate};
use crate::service::{rejected, ClinicService};
use audit_engine::{AppendOnlyLog, AuditActionType};
use billing_service::{BalanceSummary, Payment};
use chrono::Utc;
use logger_redacted::redacted_info;
use rust_decimal::Decimal;
use scheduling_service::CareType;
use serde_json::json;
use uuid::Uuid;

fn require_text(field: &str, value: &str) -> StoreResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(StoreError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

impl ClinicService {
    pub fn add_patient(&mut self, new: NewPatient, actor: &Actor) -> StoreResult<Patient> {
        let name = require_text("name", &new.name).map_err(|e| rejected("add_patient", e))?;
        let phone = require_text("phone", &new.phone).map_err(|e| rejected("add_patient", e))?;
        let doctor_name = self
            .require_doctor(new.doctor_id)
            .map_err(|e| rejected("add_patient", e))?
            .name
            .clone();

        let now = Utc::now();
        let patient = Patient {
            id: Uuid::new_v4(),
            name,
            phone,
            doctor_id: new.doctor_id,
            status: PatientStatus::New,
            status_history: AppendOnlyLog::new(),
            care_type: None,
            care_total: Decimal::ZERO,
            care_total_locked: false,
            payments: Vec::new(),
            next_appointment_id: None,
            notification_consent: new.notification_consent,
            is_deleted: false,
            medical_notes: String::new(),
            created_at: now,
            updated_at: now,
        };

        self.patients.push(patient.clone());
        self.record(
            AuditActionType::PatientCreated,
            actor,
            Some((patient.id, patient.name.as_str())),
            format!("Patient created and assigned to {}", doctor_name),
            None,
        );

        redacted_info!("Patient {} registered with phone {}", patient.id, patient.phone);
        self.commit();
        Ok(patient)
    }

    /// Apply a partial edit to contact details, doctor or consent
    pub fn update_patient(
        &mut self,
        id: Uuid,
        update: PatientUpdate,
        actor: &Actor,
    ) -> StoreResult<Patient> {
        let index = self.patient_index(id).map_err(|e| rejected("update_patient", e))?;

        let name = match &update.name {
            Some(name) => Some(require_text("name", name).map_err(|e| rejected("update_patient", e))?),
            None => None,
        };
        let phone = match &update.phone {
            Some(phone) => Some(require_text("phone", phone).map_err(|e| rejected("update_patient", e))?),
            None => None,
        };
        if let Some(doctor_id) = update.doctor_id {
            self.require_doctor(doctor_id)
                .map_err(|e| rejected("update_patient", e))?;
        }

        if update.is_empty() {
            return Ok(self.patients[index].clone());
        }

        let mut fields = Vec::new();
        let patient = &mut self.patients[index];
        if let Some(name) = name {
            patient.name = name;
            fields.push("name");
        }
        if let Some(phone) = phone {
            patient.phone = phone;
            fields.push("phone");
        }
        if let Some(doctor_id) = update.doctor_id {
            patient.doctor_id = doctor_id;
            fields.push("doctor");
        }
        if let Some(consent) = update.notification_consent {
            patient.notification_consent = consent;
            fields.push("notification_consent");
        }
        if let Some(next_appointment_id) = update.next_appointment_id {
            patient.next_appointment_id = next_appointment_id;
            fields.push("next_appointment");
        }
        patient.updated_at = Utc::now();
        let updated = patient.clone();

        self.record(
            AuditActionType::PatientUpdated,
            actor,
            Some((updated.id, updated.name.as_str())),
            format!("Patient details updated: {}", fields.join(", ")),
            Some(json!({ "fields": &fields })),
        );

        tracing::info!(patient_id = %id, fields = ?fields, "Patient updated");
        self.commit();
        Ok(updated)
    }

    /// Unconstrained status change; always leaves a history and audit entry
    pub fn update_patient_status(
        &mut self,
        id: Uuid,
        new_status: PatientStatus,
        actor: &Actor,
        reason: Option<String>,
    ) -> StoreResult<()> {
        let index = self
            .patient_index(id)
            .map_err(|e| rejected("update_patient_status", e))?;

        self.apply_status_change(index, new_status, actor, reason);
        self.commit();
        Ok(())
    }

    fn apply_status_change(
        &mut self,
        index: usize,
        new_status: PatientStatus,
        actor: &Actor,
        reason: Option<String>,
    ) {
        let now = Utc::now();
        let patient = &mut self.patients[index];
        let previous_status = patient.status;
        patient.transition(new_status, actor.id, reason.clone(), now);
        let (patient_id, patient_name) = (patient.id, patient.name.clone());

        let details = match &reason {
            Some(reason) => format!("Status: {} -> {} ({})", previous_status, new_status, reason),
            None => format!("Status: {} -> {}", previous_status, new_status),
        };

        self.record(
            AuditActionType::StatusChanged,
            actor,
            Some((patient_id, patient_name.as_str())),
            details,
            Some(json!({
                "previous_status": previous_status,
                "new_status": new_status,
                "reason": reason,
            })),
        );

        tracing::info!(
            patient_id = %patient_id,
            previous_status = %previous_status,
            new_status = %new_status,
            "Patient status changed"
        );
    }

    pub fn soft_delete_patient(&mut self, id: Uuid, actor: &Actor) -> StoreResult<()> {
        self.set_deleted(id, true, actor, "soft_delete_patient")
    }

    pub fn restore_patient(&mut self, id: Uuid, actor: &Actor) -> StoreResult<()> {
        self.set_deleted(id, false, actor, "restore_patient")
    }

    fn set_deleted(&mut self, id: Uuid, deleted: bool, actor: &Actor, context: &str) -> StoreResult<()> {
        let index = self.patient_index(id).map_err(|e| rejected(context, e))?;

        let patient = &mut self.patients[index];
        if patient.is_deleted == deleted {
            let state = if deleted { "already deleted" } else { "not deleted" };
            return Err(rejected(context, StoreError::InvalidState(format!("patient is {}", state))));
        }

        patient.is_deleted = deleted;
        patient.updated_at = Utc::now();
        let patient_name = patient.name.clone();

        let (action, details) = if deleted {
            (AuditActionType::PatientDeleted, "Patient soft-deleted")
        } else {
            (AuditActionType::PatientRestored, "Patient restored")
        };
        self.record(action, actor, Some((id, patient_name.as_str())), details.to_string(), None);

        tracing::info!(patient_id = %id, deleted, "Patient deletion flag changed");
        self.commit();
        Ok(())
    }

    pub fn add_payment(&mut self, patient_id: Uuid, amount: Decimal, actor: &Actor) -> StoreResult<Payment> {
        let index = self
            .patient_index(patient_id)
            .map_err(|e| rejected("add_payment", e))?;

        let processor = self.payments;
        let patient = &mut self.patients[index];
        let payment = processor
            .record(patient.care_total, &mut patient.payments, amount, actor.id)
            .map_err(|e| rejected("add_payment", e.into()))?
            .clone();
        patient.updated_at = payment.date;
        let patient_name = patient.name.clone();

        let details = format!("Payment of {} {} recorded", amount, self.config.currency);
        self.record(
            AuditActionType::PaymentAdded,
            actor,
            Some((patient_id, patient_name.as_str())),
            details,
            Some(json!({ "payment_id": payment.id, "amount": amount.to_string() })),
        );

        tracing::info!(patient_id = %patient_id, payment_id = %payment.id, amount = %amount, "Payment added");
        self.commit();
        Ok(payment)
    }

    /// Assign care and lock the total; a `NEW` patient moves to `IN_TREATMENT`
    pub fn set_care_type(
        &mut self,
        patient_id: Uuid,
        care_type: CareType,
        total: Decimal,
        actor: &Actor,
    ) -> StoreResult<()> {
        let index = self
            .patient_index(patient_id)
            .map_err(|e| rejected("set_care_type", e))?;
        check_care_assignment(&self.patients[index], total).map_err(|e| rejected("set_care_type", e))?;

        let now = Utc::now();
        let patient = &mut self.patients[index];
        patient.care_type = Some(care_type);
        patient.care_total = total;
        patient.care_total_locked = true;
        patient.updated_at = now;

        let started_treatment = patient.status == PatientStatus::New;
        if started_treatment {
            patient.transition(PatientStatus::InTreatment, actor.id, None, now);
        }
        let patient_name = patient.name.clone();

        let details = format!("Care: {}, total {} {}", care_type, total, self.config.currency);
        self.record(
            AuditActionType::CareAssigned,
            actor,
            Some((patient_id, patient_name.as_str())),
            details,
            Some(json!({
                "care_type": care_type,
                "care_total": total.to_string(),
                "started_treatment": started_treatment,
            })),
        );

        tracing::info!(patient_id = %patient_id, care_type = %care_type, "Care assigned");
        self.commit();
        Ok(())
    }

    /// Complete treatment; see [`check_completion`] for the gate
    pub fn mark_completed(&mut self, patient_id: Uuid, actor: &Actor, force_override: bool) -> StoreResult<()> {
        let index = self
            .patient_index(patient_id)
            .map_err(|e| rejected("mark_completed", e))?;
        let plan = check_completion(
            &self.patients[index],
            actor,
            force_override,
            &self.config.currency,
        )
        .map_err(|e| rejected("mark_completed", e))?;

        self.apply_status_change(
            index,
            PatientStatus::Completed,
            actor,
            Some("Care completed".to_string()),
        );

        if let Some(waived) = plan.waived_balance {
            let patient_name = self.patients[index].name.clone();
            let details = format!(
                "Completion forced with {} {} outstanding",
                waived, self.config.currency
            );
            self.record(
                AuditActionType::CompletedOverride,
                actor,
                Some((patient_id, patient_name.as_str())),
                details,
                Some(json!({ "remaining": waived.to_string() })),
            );
            tracing::warn!(patient_id = %patient_id, remaining = %waived, "Completion forced by owner");
        }

        self.commit();
        Ok(())
    }

    /// Replace the doctor's notes. The audit entry never carries the text.
    pub fn update_medical_notes(&mut self, patient_id: Uuid, notes: String, actor: &Actor) -> StoreResult<()> {
        let index = self
            .patient_index(patient_id)
            .map_err(|e| rejected("update_medical_notes", e))?;

        let patient = &mut self.patients[index];
        patient.medical_notes = notes;
        patient.updated_at = Utc::now();
        let patient_name = patient.name.clone();

        self.record(
            AuditActionType::PatientUpdated,
            actor,
            Some((patient_id, patient_name.as_str())),
            "Medical notes updated".to_string(),
            None,
        );

        tracing::info!(patient_id = %patient_id, "Medical notes updated");
        self.commit();
        Ok(())
    }

    pub fn patient(&self, id: Uuid) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    /// Every patient, soft-deleted ones included
    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn active_patients(&self) -> Vec<&Patient> {
        self.patients.iter().filter(|p| p.is_active()).collect()
    }

    pub fn deleted_patients(&self) -> Vec<&Patient> {
        self.patients.iter().filter(|p| p.is_deleted).collect()
    }

    pub fn patients_by_doctor(&self, doctor_id: Uuid) -> Vec<&Patient> {
        self.patients
            .iter()
            .filter(|p| p.is_active() && p.doctor_id == doctor_id)
            .collect()
    }

    pub fn patients_by_status(&self, status: PatientStatus) -> Vec<&Patient> {
        self.patients
            .iter()
            .filter(|p| p.is_active() && p.status == status)
            .collect()
    }

    pub fn patient_balance(&self, patient_id: Uuid) -> StoreResult<BalanceSummary> {
        self.patient(patient_id)
            .map(Patient::balance)
            .ok_or_else(|| StoreError::not_found(EntityKind::Patient, patient_id))
    }

    /// Current name of the patient's doctor; `None` once the doctor is deleted
    pub fn doctor_name_for(&self, patient_id: Uuid) -> Option<&str> {
        let patient = self.patient(patient_id)?;
        self.doctor(patient.doctor_id).map(|d| d.name.as_str())
    }
}
