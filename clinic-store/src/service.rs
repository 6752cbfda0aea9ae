use crate::config::ClinicConfig;
use crate::error::{EntityKind, StoreError, StoreResult};
use crate::models::{Actor, Doctor, Patient, Receptionist};
use crate::persistence::{ClinicSnapshot, JsonFileStore, MemoryStore, SnapshotStore};
use crate::seed;
use crate::staff::CredentialHasher;
use audit_engine::{AuditActionType, AuditLogEntry, AuditQuery, AuditTrail, NewAuditEntry};
use billing_service::PaymentProcessor;
use error_common::log_error;
use scheduling_service::{Appointment, ConflictChecker};
use uuid::Uuid;

/// Owner of every clinic collection.
///
/// All mutations go through `&mut self`, validate before touching state,
/// append their audit entries and then persist a snapshot.
pub struct ClinicService {
    pub(crate) config: ClinicConfig,
    pub(crate) patients: Vec<Patient>,
    pub(crate) doctors: Vec<Doctor>,
    pub(crate) receptionists: Vec<Receptionist>,
    pub(crate) appointments: Vec<Appointment>,
    pub(crate) audit: AuditTrail,
    pub(crate) checker: ConflictChecker,
    pub(crate) payments: PaymentProcessor,
    pub(crate) hasher: CredentialHasher,
    store: Box<dyn SnapshotStore>,
}

impl ClinicService {
    /// Read `CLINIC_*` settings, install the log subscriber and open the store.
    ///
    /// An already installed subscriber is left in place.
    pub fn start_from_env() -> StoreResult<Self> {
        let config = ClinicConfig::from_env();
        if let Err(e) = logger_redacted::init_logging(&config.logging) {
            tracing::debug!(error = %e, "Keeping existing tracing subscriber");
        }
        Self::from_config(config)
    }

    /// Build from configuration, choosing a file store when a snapshot path is set
    pub fn from_config(config: ClinicConfig) -> StoreResult<Self> {
        let store: Box<dyn SnapshotStore> = match &config.snapshot_path {
            Some(path) => Box::new(JsonFileStore::new(path)),
            None => Box::new(MemoryStore::new()),
        };
        Self::open(config, store)
    }

    /// Load the last snapshot from `store`, or start from demo data / empty
    /// collections when none exists.
    pub fn open(config: ClinicConfig, store: Box<dyn SnapshotStore>) -> StoreResult<Self> {
        config.validate()?;
        let hasher = CredentialHasher::new(&config.hashing)?;

        let (snapshot, fresh) = match store.load() {
            Ok(Some(snapshot)) => (snapshot, false),
            Ok(None) if config.seed_demo_data => (seed::demo_snapshot(&hasher)?, true),
            Ok(None) => (ClinicSnapshot::default(), true),
            Err(e) => {
                log_error("open", &e);
                return Err(e);
            }
        };

        if let Err(e) = snapshot.audit_logs.verify_integrity() {
            log_error("audit_integrity", &e);
        }

        tracing::info!(
            patients = snapshot.patients.len(),
            doctors = snapshot.doctors.len(),
            appointments = snapshot.appointments.len(),
            audit_entries = snapshot.audit_logs.len(),
            fresh,
            "Clinic state opened"
        );

        let service = Self {
            checker: ConflictChecker::new(config.scheduling),
            payments: PaymentProcessor::new(config.enforce_payment_ceiling),
            hasher,
            config,
            patients: snapshot.patients,
            doctors: snapshot.doctors,
            receptionists: snapshot.receptionists,
            appointments: snapshot.appointments,
            audit: snapshot.audit_logs,
            store,
        };

        if fresh {
            service.commit();
        }

        Ok(service)
    }

    pub fn config(&self) -> &ClinicConfig {
        &self.config
    }

    /// Copy of the full state, as it would be persisted
    pub fn snapshot(&self) -> ClinicSnapshot {
        ClinicSnapshot {
            patients: self.patients.clone(),
            doctors: self.doctors.clone(),
            receptionists: self.receptionists.clone(),
            appointments: self.appointments.clone(),
            audit_logs: self.audit.clone(),
        }
    }

    /// Save the current state, surfacing any storage failure
    pub fn persist(&self) -> StoreResult<()> {
        self.store.save(&self.snapshot())
    }

    /// Persist after a mutation. A failed save keeps the in-memory state.
    pub(crate) fn commit(&self) {
        if let Err(e) = self.persist() {
            log_error("persist", &e);
        }
    }

    /// Replace every collection with the demo data set
    pub fn reset_to_demo(&mut self) -> StoreResult<()> {
        let snapshot = seed::demo_snapshot(&self.hasher)?;

        self.patients = snapshot.patients;
        self.doctors = snapshot.doctors;
        self.receptionists = snapshot.receptionists;
        self.appointments = snapshot.appointments;
        self.audit = snapshot.audit_logs;

        tracing::info!("Clinic state reset to demo data");
        self.commit();
        Ok(())
    }

    /// Append an externally built entry
    pub fn add_audit_log(&mut self, entry: NewAuditEntry) -> AuditLogEntry {
        let recorded = self.audit.record(entry).clone();
        self.commit();
        recorded
    }

    pub fn audit_trail(&self) -> &AuditTrail {
        &self.audit
    }

    /// Audit entries, newest first
    pub fn audit_log(&self) -> Vec<&AuditLogEntry> {
        self.audit.newest_first().collect()
    }

    pub fn search_audit(&self, query: &AuditQuery) -> Vec<&AuditLogEntry> {
        query.execute(&self.audit)
    }

    pub fn verify_audit_integrity(&self) -> audit_engine::Result<()> {
        self.audit.verify_integrity()
    }

    pub(crate) fn record(
        &mut self,
        action: AuditActionType,
        actor: &Actor,
        patient: Option<(Uuid, &str)>,
        details: String,
        metadata: Option<serde_json::Value>,
    ) {
        let mut entry = NewAuditEntry::new(action, actor.role, actor.id, actor.name.clone(), details);
        if let Some((patient_id, patient_name)) = patient {
            entry = entry.with_patient(patient_id, patient_name);
        }
        if let Some(metadata) = metadata {
            entry = entry.with_metadata(metadata);
        }
        self.audit.record(entry);
    }

    pub(crate) fn patient_index(&self, id: Uuid) -> StoreResult<usize> {
        self.patients
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Patient, id))
    }

    pub(crate) fn appointment_index(&self, id: Uuid) -> StoreResult<usize> {
        self.appointments
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Appointment, id))
    }

    pub(crate) fn require_doctor(&self, id: Uuid) -> StoreResult<&Doctor> {
        self.doctors
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Doctor, id))
    }

    pub(crate) fn patient_name(&self, id: Uuid) -> Option<String> {
        self.patients
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
    }
}

/// Log a rejected operation and hand the error back
pub(crate) fn rejected(context: &str, error: StoreError) -> StoreError {
    log_error(context, &error);
    error
}
