// Clinic-hours and double-booking detection
use crate::models::{Appointment, SchedulingPolicy};
use chrono::{Duration, NaiveDateTime, Timelike};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Candidate booking to validate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposedAppointment {
    pub doctor_id: Uuid,
    pub start: NaiveDateTime,
    pub duration_minutes: u32,
}

impl ProposedAppointment {
    pub fn new(doctor_id: Uuid, start: NaiveDateTime, duration_minutes: u32) -> Self {
        Self {
            doctor_id,
            start,
            duration_minutes,
        }
    }

    pub fn end(&self) -> NaiveDateTime {
        self.start + Duration::minutes(i64::from(self.duration_minutes))
    }
}

impl From<&Appointment> for ProposedAppointment {
    fn from(appointment: &Appointment) -> Self {
        Self::new(
            appointment.doctor_id,
            appointment.start,
            appointment.duration_minutes,
        )
    }
}

/// Why a proposal was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConflictReason {
    OutsideClinicHours {
        open_hour: u32,
        close_hour: u32,
    },
    Overlap {
        existing_start: NaiveDateTime,
        existing_end: NaiveDateTime,
    },
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictReason::OutsideClinicHours {
                open_hour,
                close_hour,
            } => write!(
                f,
                "Outside clinic hours ({:02}:00 - {:02}:00)",
                open_hour, close_hour
            ),
            ConflictReason::Overlap {
                existing_start,
                existing_end,
            } => write!(
                f,
                "Conflicts with an existing appointment ({} - {})",
                existing_start.format("%H:%M"),
                existing_end.format("%H:%M")
            ),
        }
    }
}

/// Outcome of a conflict check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictCheck {
    pub has_conflict: bool,
    /// Set only for double-bookings
    pub conflicting_appointment: Option<Appointment>,
    pub reason: Option<ConflictReason>,
}

impl ConflictCheck {
    pub fn clear() -> Self {
        Self {
            has_conflict: false,
            conflicting_appointment: None,
            reason: None,
        }
    }

    fn outside_hours(policy: &SchedulingPolicy) -> Self {
        Self {
            has_conflict: true,
            conflicting_appointment: None,
            reason: Some(ConflictReason::OutsideClinicHours {
                open_hour: policy.open_hour,
                close_hour: policy.close_hour,
            }),
        }
    }

    fn overlap(existing: &Appointment) -> Self {
        Self {
            has_conflict: true,
            conflicting_appointment: Some(existing.clone()),
            reason: Some(ConflictReason::Overlap {
                existing_start: existing.start,
                existing_end: existing.end(),
            }),
        }
    }
}

impl fmt::Display for ConflictCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{}", reason),
            None => f.write_str("No conflict"),
        }
    }
}

/// Pure validator of proposals against a doctor's existing bookings
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictChecker {
    policy: SchedulingPolicy,
}

impl ConflictChecker {
    pub fn new(policy: SchedulingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SchedulingPolicy {
        &self.policy
    }

    pub fn check(&self, proposed: &ProposedAppointment, existing: &[Appointment]) -> ConflictCheck {
        self.check_excluding(proposed, existing, None)
    }

    /// Same as [`ConflictChecker::check`] but ignores the appointment with
    /// `exclude_id`, so a booking can be moved without colliding with itself.
    pub fn check_excluding(
        &self,
        proposed: &ProposedAppointment,
        existing: &[Appointment],
        exclude_id: Option<Uuid>,
    ) -> ConflictCheck {
        if !self.within_clinic_hours(proposed) {
            return ConflictCheck::outside_hours(&self.policy);
        }

        let start = proposed.start;
        let end = proposed.end();

        let clash = existing.iter().find(|appointment| {
            appointment.doctor_id == proposed.doctor_id
                && !appointment.is_cancelled()
                && Some(appointment.id) != exclude_id
                && appointment.overlaps(start, end)
        });

        match clash {
            Some(appointment) => ConflictCheck::overlap(appointment),
            None => ConflictCheck::clear(),
        }
    }

    /// Start hour at or after opening and end hour, rounded up, at or before
    /// closing, on the same calendar day.
    fn within_clinic_hours(&self, proposed: &ProposedAppointment) -> bool {
        let end = proposed.end();
        if end.date() != proposed.start.date() {
            return false;
        }

        let start_hour = proposed.start.hour();
        let end_hour = end.hour() + u32::from(end.minute() > 0);

        start_hour >= self.policy.open_hour && end_hour <= self.policy.close_hour
    }
}

/// Conflict check under the default 08:00 - 23:00 policy
pub fn check_conflict(proposed: &ProposedAppointment, existing: &[Appointment]) -> ConflictCheck {
    ConflictChecker::default().check(proposed, existing)
}
