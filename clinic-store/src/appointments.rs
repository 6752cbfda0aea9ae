// Appointment lifecycle layered on the conflict checker
use crate::error::{EntityKind, StoreError, StoreResult};
use crate::models::{Actor, AppointmentUpdate, NewAppointment};
use crate::service::{rejected, ClinicService};
use audit_engine::AuditActionType;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use scheduling_service::{
    validate_duration, Appointment, AppointmentConfirmation, ConflictCheck, ProposedAppointment,
};
use serde_json::json;
use uuid::Uuid;

impl ClinicService {
    /// Conflicts pass only for the owner or with an explicit override; the
    /// bypassed check is returned so the caller can log it.
    fn resolve_conflict(
        context: &str,
        check: ConflictCheck,
        actor: &Actor,
        force_override: bool,
    ) -> StoreResult<Option<ConflictCheck>> {
        if !check.has_conflict {
            return Ok(None);
        }
        if actor.is_owner() || force_override {
            return Ok(Some(check));
        }
        Err(rejected(context, StoreError::conflict(check)))
    }

    fn record_override(&mut self, actor: &Actor, appointment: &Appointment, check: &ConflictCheck) {
        let patient_name = self.patient_name(appointment.patient_id).unwrap_or_default();
        self.record(
            AuditActionType::SchedulingOverride,
            actor,
            Some((appointment.patient_id, patient_name.as_str())),
            format!("Scheduling conflict overridden by {}: {}", actor.name, check),
            Some(json!({
                "appointment_id": appointment.id,
                "conflicting_appointment_id": check.conflicting_appointment.as_ref().map(|a| a.id),
            })),
        );
        tracing::warn!(
            appointment_id = %appointment.id,
            actor_id = %actor.id,
            reason = %check,
            "Scheduling conflict overridden"
        );
    }

    /// Book an appointment after checking clinic hours and the doctor's calendar
    pub fn add_appointment(
        &mut self,
        new: NewAppointment,
        actor: &Actor,
        force_override: bool,
    ) -> StoreResult<Appointment> {
        let context = "add_appointment";
        let patient_name = self
            .patient_name(new.patient_id)
            .ok_or_else(|| rejected(context, StoreError::not_found(EntityKind::Patient, new.patient_id)))?;
        self.require_doctor(new.doctor_id)
            .map_err(|e| rejected(context, e))?;

        let duration_minutes = new
            .duration_minutes
            .unwrap_or_else(|| new.care_type.default_duration_minutes());
        validate_duration(duration_minutes).map_err(|e| rejected(context, e.into()))?;

        let proposed = ProposedAppointment::new(new.doctor_id, new.start, duration_minutes);
        let check = self.checker.check(&proposed, &self.appointments);
        let bypassed = Self::resolve_conflict(context, check, actor, force_override)?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: new.patient_id,
            doctor_id: new.doctor_id,
            start: new.start,
            duration_minutes,
            care_type: new.care_type,
            confirmation: new.confirmation,
            completed: false,
            notes: new.notes,
        };
        self.appointments.push(appointment.clone());

        self.record(
            AuditActionType::AppointmentScheduled,
            actor,
            Some((appointment.patient_id, patient_name.as_str())),
            format!(
                "Appointment scheduled for {} at {}",
                appointment.start.format("%Y-%m-%d"),
                appointment.start.format("%H:%M")
            ),
            Some(json!({
                "appointment_id": appointment.id,
                "doctor_id": appointment.doctor_id,
                "duration_minutes": duration_minutes,
            })),
        );
        if let Some(check) = &bypassed {
            self.record_override(actor, &appointment, check);
        }

        tracing::info!(
            appointment_id = %appointment.id,
            doctor_id = %appointment.doctor_id,
            start = %appointment.start,
            "Appointment scheduled"
        );
        self.commit();
        Ok(appointment)
    }

    /// Apply a partial change; a new time, length or doctor is re-checked
    /// against every other booking.
    pub fn update_appointment(
        &mut self,
        id: Uuid,
        update: AppointmentUpdate,
        actor: &Actor,
        force_override: bool,
    ) -> StoreResult<Appointment> {
        let context = "update_appointment";
        let index = self.appointment_index(id).map_err(|e| rejected(context, e))?;

        if let Some(doctor_id) = update.doctor_id {
            self.require_doctor(doctor_id).map_err(|e| rejected(context, e))?;
        }
        if let Some(duration_minutes) = update.duration_minutes {
            validate_duration(duration_minutes).map_err(|e| rejected(context, e.into()))?;
        }

        let timing_changed = update.changes_timing();
        let current = &self.appointments[index];
        let mut updated = current.clone();
        let mut fields = Vec::new();

        if let Some(doctor_id) = update.doctor_id.filter(|d| *d != current.doctor_id) {
            updated.doctor_id = doctor_id;
            fields.push("doctor");
        }
        if let Some(start) = update.start.filter(|s| *s != current.start) {
            updated.start = start;
            fields.push("start");
        }
        if let Some(duration) = update.duration_minutes.filter(|d| *d != current.duration_minutes) {
            updated.duration_minutes = duration;
            fields.push("duration");
        }
        if let Some(care_type) = update.care_type.filter(|c| *c != current.care_type) {
            updated.care_type = care_type;
            fields.push("care_type");
        }
        if let Some(confirmation) = update.confirmation.filter(|c| *c != current.confirmation) {
            updated.confirmation = confirmation;
            fields.push("confirmation");
        }
        if let Some(completed) = update.completed.filter(|c| *c != current.completed) {
            updated.completed = completed;
            fields.push("completed");
        }
        if let Some(notes) = update.notes.filter(|n| *n != current.notes) {
            updated.notes = notes;
            fields.push("notes");
        }

        if fields.is_empty() {
            return Ok(updated);
        }

        // a cancelled booking coming back must fit the calendar again
        let reactivated = current.is_cancelled() && !updated.is_cancelled();
        let bypassed = if (timing_changed || reactivated) && !updated.is_cancelled() {
            let check = self.checker.check_excluding(
                &ProposedAppointment::from(&updated),
                &self.appointments,
                Some(id),
            );
            Self::resolve_conflict(context, check, actor, force_override)?
        } else {
            None
        };

        self.appointments[index] = updated.clone();

        let patient_name = self.patient_name(updated.patient_id).unwrap_or_default();
        self.record(
            AuditActionType::AppointmentChanged,
            actor,
            Some((updated.patient_id, patient_name.as_str())),
            format!("Appointment updated: {}", fields.join(", ")),
            Some(json!({ "appointment_id": id, "fields": &fields })),
        );
        if let Some(check) = &bypassed {
            self.record_override(actor, &updated, check);
        }

        tracing::info!(appointment_id = %id, fields = ?fields, "Appointment updated");
        self.commit();
        Ok(updated)
    }

    /// Mark as cancelled; the booking is kept but frees the slot
    pub fn cancel_appointment(&mut self, id: Uuid, actor: &Actor) -> StoreResult<Appointment> {
        self.set_confirmation(
            id,
            AppointmentConfirmation::Cancelled,
            AuditActionType::AppointmentCancelled,
            actor,
            "cancel_appointment",
        )
    }

    /// Idempotent; every call is audited. Confirming a cancelled booking
    /// re-checks its slot, and only the owner may confirm over a conflict.
    pub fn confirm_appointment(&mut self, id: Uuid, actor: &Actor) -> StoreResult<Appointment> {
        self.set_confirmation(
            id,
            AppointmentConfirmation::Confirmed,
            AuditActionType::AppointmentConfirmed,
            actor,
            "confirm_appointment",
        )
    }

    fn set_confirmation(
        &mut self,
        id: Uuid,
        confirmation: AppointmentConfirmation,
        action: AuditActionType,
        actor: &Actor,
        context: &str,
    ) -> StoreResult<Appointment> {
        let index = self.appointment_index(id).map_err(|e| rejected(context, e))?;

        let mut appointment = self.appointments[index].clone();
        let reactivated =
            appointment.is_cancelled() && confirmation != AppointmentConfirmation::Cancelled;
        appointment.confirmation = confirmation;

        let bypassed = if reactivated {
            let check = self.checker.check_excluding(
                &ProposedAppointment::from(&appointment),
                &self.appointments,
                Some(id),
            );
            Self::resolve_conflict(context, check, actor, false)?
        } else {
            None
        };
        self.appointments[index] = appointment.clone();

        let patient_name = self.patient_name(appointment.patient_id).unwrap_or_default();
        let details = match confirmation {
            AppointmentConfirmation::Cancelled => "Appointment cancelled",
            _ => "Appointment confirmed",
        };
        self.record(
            action,
            actor,
            Some((appointment.patient_id, patient_name.as_str())),
            details.to_string(),
            Some(json!({ "appointment_id": id })),
        );
        if let Some(check) = &bypassed {
            self.record_override(actor, &appointment, check);
        }

        tracing::info!(appointment_id = %id, confirmation = %confirmation, "Appointment confirmation changed");
        self.commit();
        Ok(appointment)
    }

    pub fn appointment(&self, id: Uuid) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Every booking of a doctor, cancelled ones included
    pub fn appointments_by_doctor(&self, doctor_id: Uuid) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.doctor_id == doctor_id)
            .collect()
    }

    /// Bookings starting after `now` and no later than `hours` ahead,
    /// excluding cancelled and completed ones, soonest first.
    pub fn upcoming_appointments_at(&self, now: NaiveDateTime, hours: u32) -> Vec<&Appointment> {
        let cutoff = now
            .checked_add_signed(Duration::hours(i64::from(hours)))
            .unwrap_or(NaiveDateTime::MAX);
        let mut upcoming: Vec<&Appointment> = self
            .appointments
            .iter()
            .filter(|a| a.is_active() && a.start > now && a.start <= cutoff)
            .collect();
        upcoming.sort_by_key(|a| a.start);
        upcoming
    }

    /// [`ClinicService::upcoming_appointments_at`] from the current clinic-local time
    pub fn upcoming_appointments(&self, hours: u32) -> Vec<&Appointment> {
        self.upcoming_appointments_at(Local::now().naive_local(), hours)
    }

    /// Upcoming bookings within the configured reminder window
    pub fn upcoming_appointments_in_window(&self) -> Vec<&Appointment> {
        self.upcoming_appointments(self.config.upcoming_window_hours)
    }

    pub fn find_available_slots(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        duration_minutes: u32,
    ) -> Vec<NaiveDateTime> {
        self.checker
            .available_slots(doctor_id, date, duration_minutes, &self.appointments)
    }
}
