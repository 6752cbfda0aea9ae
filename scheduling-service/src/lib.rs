//! Scheduling Service for the clinic core
//!
//! Appointments are booked against a doctor's calendar in clinic-local
//! wall-clock time ([`chrono::NaiveDateTime`]). Two rules apply:
//! - the whole appointment must fit inside opening hours (08:00 - 23:00 by default)
//! - a doctor never has two overlapping appointments that are not cancelled
//!
//! Intervals are half-open, so an appointment ending at 10:00 does not
//! collide with one starting at 10:00.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use scheduling_service::{ConflictChecker, ProposedAppointment, SchedulingPolicy};
//! use uuid::Uuid;
//!
//! let checker = ConflictChecker::new(SchedulingPolicy::default());
//! let start = NaiveDate::from_ymd_opt(2025, 2, 10)
//!     .and_then(|d| d.and_hms_opt(7, 30, 0))
//!     .unwrap();
//!
//! let check = checker.check(&ProposedAppointment::new(Uuid::new_v4(), start, 30), &[]);
//! assert!(check.has_conflict);
//! assert!(check.conflicting_appointment.is_none());
//! ```

pub mod conflict;
pub mod error;
pub mod models;
pub mod slots;

pub use conflict::*;
pub use error::*;
pub use models::*;
pub use slots::*;
