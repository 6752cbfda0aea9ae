use crate::error::{SchedulingError, SchedulingResult};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Treatments offered by the clinic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareType {
    Consultation,
    Scaling,
    Whitening,
    Extraction,
    DentalImplant,
    Crown,
    Bridge,
    Orthodontics,
    RootCanal,
}

impl CareType {
    pub const ALL: [CareType; 9] = [
        CareType::Consultation,
        CareType::Scaling,
        CareType::Whitening,
        CareType::Extraction,
        CareType::DentalImplant,
        CareType::Crown,
        CareType::Bridge,
        CareType::Orthodontics,
        CareType::RootCanal,
    ];

    /// Chair time booked when no explicit duration is given
    pub fn default_duration_minutes(&self) -> u32 {
        match self {
            CareType::Consultation | CareType::Scaling | CareType::Extraction => 30,
            CareType::Whitening
            | CareType::DentalImplant
            | CareType::Crown
            | CareType::Bridge
            | CareType::Orthodontics
            | CareType::RootCanal => 60,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CareType::Consultation => "Consultation",
            CareType::Scaling => "Scaling",
            CareType::Whitening => "Whitening",
            CareType::Extraction => "Extraction",
            CareType::DentalImplant => "Dental implant",
            CareType::Crown => "Crown",
            CareType::Bridge => "Bridge",
            CareType::Orthodontics => "Orthodontics",
            CareType::RootCanal => "Root canal",
        }
    }
}

impl fmt::Display for CareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Appointment scheduling state, independent from the patient's treatment status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentConfirmation {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Unconfirmed,
}

impl AppointmentConfirmation {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentConfirmation::Pending => "PENDING",
            AppointmentConfirmation::Confirmed => "CONFIRMED",
            AppointmentConfirmation::Cancelled => "CANCELLED",
            AppointmentConfirmation::Unconfirmed => "UNCONFIRMED",
        }
    }
}

impl fmt::Display for AppointmentConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booked appointment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    /// Clinic-local start time
    pub start: NaiveDateTime,
    pub duration_minutes: u32,
    pub care_type: CareType,
    pub confirmation: AppointmentConfirmation,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Appointment {
    pub fn end(&self) -> NaiveDateTime {
        self.start + Duration::minutes(i64::from(self.duration_minutes))
    }

    pub fn is_cancelled(&self) -> bool {
        self.confirmation == AppointmentConfirmation::Cancelled
    }

    /// Still occupies the doctor's calendar
    pub fn is_active(&self) -> bool {
        !self.is_cancelled() && !self.completed
    }

    /// Half-open interval overlap with `[start, end)`
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start < self.end() && end > self.start
    }
}

/// Opening hours and slot granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingPolicy {
    pub open_hour: u32,
    pub close_hour: u32,
    pub slot_interval_minutes: u32,
}

impl SchedulingPolicy {
    pub const DEFAULT_OPEN_HOUR: u32 = 8;
    pub const DEFAULT_CLOSE_HOUR: u32 = 23;
    pub const DEFAULT_SLOT_INTERVAL_MINUTES: u32 = 30;

    pub fn validate(&self) -> SchedulingResult<()> {
        if self.close_hour > 24 {
            return Err(SchedulingError::InvalidPolicy(format!(
                "close hour {} is past midnight",
                self.close_hour
            )));
        }
        if self.open_hour >= self.close_hour {
            return Err(SchedulingError::InvalidPolicy(format!(
                "open hour {} must be before close hour {}",
                self.open_hour, self.close_hour
            )));
        }
        if self.slot_interval_minutes == 0 {
            return Err(SchedulingError::InvalidPolicy(
                "slot interval must be at least one minute".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            open_hour: Self::DEFAULT_OPEN_HOUR,
            close_hour: Self::DEFAULT_CLOSE_HOUR,
            slot_interval_minutes: Self::DEFAULT_SLOT_INTERVAL_MINUTES,
        }
    }
}

/// Reject zero-length bookings
pub fn validate_duration(duration_minutes: u32) -> SchedulingResult<()> {
    if duration_minutes == 0 {
        return Err(SchedulingError::InvalidDuration);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 2, 10)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn appointment(start: NaiveDateTime, duration_minutes: u32) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            start,
            duration_minutes,
            care_type: CareType::Consultation,
            confirmation: AppointmentConfirmation::Pending,
            completed: false,
            notes: None,
        }
    }

    #[test]
    fn test_care_durations() {
        assert_eq!(CareType::Consultation.default_duration_minutes(), 30);
        assert_eq!(CareType::Extraction.default_duration_minutes(), 30);
        assert_eq!(CareType::RootCanal.default_duration_minutes(), 60);
        assert!(CareType::ALL
            .iter()
            .all(|c| matches!(c.default_duration_minutes(), 30 | 60)));
    }

    #[test]
    fn test_half_open_overlap() {
        let existing = appointment(at(10, 0), 60);
        assert_eq!(existing.end(), at(11, 0));
        assert!(existing.overlaps(at(10, 30), at(11, 0)));
        assert!(!existing.overlaps(at(9, 0), at(10, 0)));
        assert!(!existing.overlaps(at(11, 0), at(11, 30)));
    }

    #[test]
    fn test_confirmation_wire_format() {
        let json = serde_json::to_string(&AppointmentConfirmation::Unconfirmed).unwrap();
        assert_eq!(json, "\"UNCONFIRMED\"");
        let care = serde_json::to_string(&CareType::DentalImplant).unwrap();
        assert_eq!(care, "\"dental_implant\"");
    }

    #[test]
    fn test_policy_validation() {
        assert!(SchedulingPolicy::default().validate().is_ok());

        let inverted = SchedulingPolicy {
            open_hour: 18,
            close_hour: 9,
            ..SchedulingPolicy::default()
        };
        assert!(inverted.validate().is_err());

        let no_step = SchedulingPolicy {
            slot_interval_minutes: 0,
            ..SchedulingPolicy::default()
        };
        assert!(no_step.validate().is_err());
    }

    #[test]
    fn test_zero_duration_rejected() {
        assert_eq!(validate_duration(0), Err(SchedulingError::InvalidDuration));
        assert!(validate_duration(15).is_ok());
    }
}
