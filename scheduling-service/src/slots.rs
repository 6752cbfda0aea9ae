// Free-slot enumeration for a doctor's day
use crate::conflict::{ConflictChecker, ProposedAppointment};
use crate::models::{Appointment, SchedulingPolicy};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

impl ConflictChecker {
    /// Start times on `date`, every slot interval from opening, at which an
    /// appointment of `duration_minutes` would be accepted. Ordered, possibly empty.
    pub fn available_slots(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        duration_minutes: u32,
        existing: &[Appointment],
    ) -> Vec<NaiveDateTime> {
        if duration_minutes == 0 {
            return Vec::new();
        }

        let policy = self.policy();
        let midnight = date.and_time(NaiveTime::MIN);
        let day_end = midnight + Duration::hours(i64::from(policy.close_hour));
        let step = Duration::minutes(i64::from(policy.slot_interval_minutes.max(1)));
        let length = Duration::minutes(i64::from(duration_minutes));

        let mut slots = Vec::new();
        let mut start = midnight + Duration::hours(i64::from(policy.open_hour));

        while start + length <= day_end {
            let proposed = ProposedAppointment::new(doctor_id, start, duration_minutes);
            if !self.check(&proposed, existing).has_conflict {
                slots.push(start);
            }
            start += step;
        }

        tracing::trace!(
            doctor_id = %doctor_id,
            date = %date,
            duration_minutes,
            found = slots.len(),
            "Computed available slots"
        );

        slots
    }
}

/// Slot search under the default policy (08:00 - 23:00, 30-minute steps)
pub fn find_available_slots(
    doctor_id: Uuid,
    date: NaiveDate,
    duration_minutes: u32,
    existing: &[Appointment],
) -> Vec<NaiveDateTime> {
    ConflictChecker::new(SchedulingPolicy::default()).available_slots(
        doctor_id,
        date,
        duration_minutes,
        existing,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentConfirmation, CareType};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        day().and_hms_opt(hour, minute, 0).unwrap()
    }

    fn booked(doctor_id: Uuid, start: NaiveDateTime, duration_minutes: u32) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id,
            start,
            duration_minutes,
            care_type: CareType::Extraction,
            confirmation: AppointmentConfirmation::Pending,
            completed: false,
            notes: None,
        }
    }

    #[test]
    fn test_empty_day_offers_every_half_hour() {
        let slots = find_available_slots(Uuid::new_v4(), day(), 30, &[]);
        // 08:00 through 22:30
        assert_eq!(slots.len(), 30);
        assert_eq!(slots.first(), Some(&at(8, 0)));
        assert_eq!(slots.last(), Some(&at(22, 30)));
    }

    #[test]
    fn test_slots_around_existing_booking() {
        let doctor = Uuid::new_v4();
        let existing = vec![booked(doctor, at(10, 0), 60)];

        let slots = find_available_slots(doctor, day(), 30, &existing);

        for expected in [at(8, 0), at(8, 30), at(9, 0), at(9, 30), at(11, 0), at(22, 30)] {
            assert!(slots.contains(&expected), "missing {}", expected);
        }
        // 10:00 and 10:30 both fall inside the 10:00 - 11:00 booking
        assert!(!slots.contains(&at(10, 0)));
        assert!(!slots.contains(&at(10, 30)));
        assert_eq!(slots.len(), 28);
        assert!(slots.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_long_treatment_stops_before_closing() {
        let slots = find_available_slots(Uuid::new_v4(), day(), 60, &[]);
        assert_eq!(slots.last(), Some(&at(22, 0)));
    }

    #[test]
    fn test_duration_longer_than_day_has_no_slots() {
        assert!(find_available_slots(Uuid::new_v4(), day(), 16 * 60, &[]).is_empty());
        assert!(find_available_slots(Uuid::new_v4(), day(), 0, &[]).is_empty());
    }

    #[test]
    fn test_custom_interval() {
        let checker = ConflictChecker::new(SchedulingPolicy {
            slot_interval_minutes: 60,
            ..SchedulingPolicy::default()
        });
        let slots = checker.available_slots(Uuid::new_v4(), day(), 60, &[]);
        assert_eq!(slots.len(), 15);
        assert_eq!(slots[1], at(9, 0));
    }
}
