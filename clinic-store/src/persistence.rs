// Snapshot storage for the clinic state
use crate::error::{StoreError, StoreResult};
use crate::models::{Doctor, Patient, Receptionist};
use audit_engine::AuditTrail;
use parking_lot::Mutex;
use scheduling_service::Appointment;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything the service owns, as persisted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClinicSnapshot {
    pub patients: Vec<Patient>,
    pub doctors: Vec<Doctor>,
    pub receptionists: Vec<Receptionist>,
    pub appointments: Vec<Appointment>,
    pub audit_logs: AuditTrail,
}

/// Load/save collaborator; the service persists after every mutation
pub trait SnapshotStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> StoreResult<Option<ClinicSnapshot>>;

    fn save(&self, snapshot: &ClinicSnapshot) -> StoreResult<()>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Arc<S> {
    fn load(&self) -> StoreResult<Option<ClinicSnapshot>> {
        (**self).load()
    }

    fn save(&self, snapshot: &ClinicSnapshot) -> StoreResult<()> {
        (**self).save(snapshot)
    }
}

/// JSON file on disk, replaced atomically on each save
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> StoreResult<Option<ClinicSnapshot>> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No snapshot on disk");
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path).map_err(StoreError::SnapshotRead)?;
        let snapshot = serde_json::from_str(&contents)?;
        tracing::debug!(path = %self.path.display(), "Snapshot loaded");
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &ClinicSnapshot) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(StoreError::SnapshotWrite)?;
            }
        }

        let contents = serde_json::to_string_pretty(snapshot)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, contents).map_err(StoreError::SnapshotWrite)?;
        fs::rename(&temp_path, &self.path).map_err(StoreError::SnapshotWrite)?;

        tracing::trace!(path = %self.path.display(), "Snapshot saved");
        Ok(())
    }
}

/// Serialized snapshot held in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    contents: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last saved JSON document
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> StoreResult<Option<ClinicSnapshot>> {
        match self.contents.lock().as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &ClinicSnapshot) -> StoreResult<()> {
        let json = serde_json::to_string(snapshot)?;
        *self.contents.lock() = Some(json);
        Ok(())
    }
}
