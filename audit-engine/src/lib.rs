//! Audit trail for the clinic core
//!
//! Every mutation that touches a patient, an appointment or a payment leaves
//! exactly one (sometimes two, for overrides) entry here. The trail is the
//! only historical source of truth for the owner's read-only audit view.
//!
//! - Append-only: [`AppendOnlyLog`] has no API that edits or removes items
//! - Tamper-evident: each entry stores the SHA-256 of its predecessor
//! - Newest-first views for display, insertion order for integrity checks
//! - Text and action filters via [`AuditQuery`]
//!
//! # Example
//!
//! ```rust
//! use audit_engine::{ActorRole, AuditActionType, AuditQuery, AuditTrail, NewAuditEntry};
//! use uuid::Uuid;
//!
//! let mut trail = AuditTrail::new();
//! let patient_id = Uuid::new_v4();
//!
//! trail.record(
//!     NewAuditEntry::new(
//!         AuditActionType::PaymentAdded,
//!         ActorRole::Receptionist,
//!         Uuid::new_v4(),
//!         "Sarah Amrani",
//!         "Payment of 20000 DA recorded",
//!     )
//!     .with_patient(patient_id, "Mohamed Kadi"),
//! );
//!
//! assert!(trail.verify_integrity().is_ok());
//!
//! let hits = AuditQuery::new().text("kadi").execute(&trail);
//! assert_eq!(hits.len(), 1);
//! ```

pub mod entry;
pub mod error;
pub mod search;
pub mod trail;

pub use entry::*;
pub use error::*;
pub use search::*;
pub use trail::*;
