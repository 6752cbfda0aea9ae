//! Clinic Store
//!
//! [`ClinicService`] owns every collection of the clinic dashboard and is the
//! only way to change them:
//! - Patients and their treatment status (NEW -> IN_TREATMENT -> COMPLETED /
//!   CANCELLED / NO_SHOW), care assignment and payments
//! - Appointments, checked against clinic hours and the doctor's calendar
//! - Doctor and receptionist accounts with argon2-hashed passwords
//! - The hash-chained audit trail every mutation writes to
//!
//! State is persisted as a [`ClinicSnapshot`] through a [`SnapshotStore`]
//! after each successful mutation.
//!
//! # Example
//!
//! ```rust,no_run
//! use clinic_store::{seed, Actor, ClinicService, NewPatient, NotificationConsent};
//! use rust_decimal::Decimal;
//! use scheduling_service::CareType;
//!
//! # fn main() -> clinic_store::StoreResult<()> {
//! let mut clinic = ClinicService::start_from_env()?;
//! let receptionist = Actor::receptionist(&clinic.receptionists()[0]);
//!
//! let patient = clinic.add_patient(
//!     NewPatient {
//!         name: "Lina Haddad".to_string(),
//!         phone: "0550000000".to_string(),
//!         doctor_id: seed::ids::DOCTOR_BENALI,
//!         notification_consent: NotificationConsent::Granted,
//!     },
//!     &receptionist,
//! )?;
//!
//! let doctor = Actor::doctor(&clinic.doctors()[0]);
//! clinic.set_care_type(patient.id, CareType::Crown, Decimal::from(30000), &doctor)?;
//! clinic.add_payment(patient.id, Decimal::from(30000), &receptionist)?;
//! clinic.mark_completed(patient.id, &receptionist, false)?;
//! # Ok(())
//! # }
//! ```

pub mod appointments;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod patients;
pub mod persistence;
pub mod reports;
pub mod seed;
pub mod service;
pub mod staff;

pub use config::*;
pub use error::*;
pub use lifecycle::*;
pub use models::*;
pub use persistence::*;
pub use reports::*;
pub use service::*;
pub use staff::*;
