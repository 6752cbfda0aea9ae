// Append-only storage and the hash-chained audit trail
use crate::entry::{AuditLogEntry, NewAuditEntry};
use crate::error::{AuditError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const GENESIS_HASH: &str = "0";

/// Write-once sequence: items can be appended and read, never edited or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppendOnlyLog<T> {
    items: Vec<T>,
}

impl<T> AppendOnlyLog<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append an item and return a shared reference to it
    pub fn push(&mut self, item: T) -> &T {
        let index = self.items.len();
        self.items.push(item);
        &self.items[index]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn newest_first(&self) -> std::iter::Rev<std::slice::Iter<'_, T>> {
        self.items.iter().rev()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }
}

impl<T> Default for AppendOnlyLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for AppendOnlyLog<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for AppendOnlyLog<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a AppendOnlyLog<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Hash-chained audit log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditTrail {
    entries: AppendOnlyLog<AuditLogEntry>,
}

impl AuditTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign id + current timestamp and append
    pub fn record(&mut self, entry: NewAuditEntry) -> &AuditLogEntry {
        self.record_at(entry, Utc::now())
    }

    /// Append with an explicit timestamp (seed data, imports)
    pub fn record_at(&mut self, entry: NewAuditEntry, timestamp: DateTime<Utc>) -> &AuditLogEntry {
        let sealed = AuditLogEntry::seal(entry, Uuid::new_v4(), timestamp, self.last_hash().to_string());

        tracing::debug!(
            audit_id = %sealed.id,
            action = %sealed.action_type,
            actor_role = %sealed.actor_role,
            "Audit entry recorded"
        );

        self.entries.push(sealed)
    }

    pub fn last_hash(&self) -> &str {
        self.entries
            .last()
            .map(|e| e.entry_hash.as_str())
            .unwrap_or(GENESIS_HASH)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in recording order
    pub fn entries(&self) -> &[AuditLogEntry] {
        self.entries.as_slice()
    }

    /// Display order for the owner's audit view
    pub fn newest_first(&self) -> impl Iterator<Item = &AuditLogEntry> {
        self.entries.newest_first()
    }

    pub fn get(&self, id: Uuid) -> Option<&AuditLogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Walk the chain from the genesis hash and recompute every entry hash
    pub fn verify_integrity(&self) -> Result<()> {
        let mut expected_prev = GENESIS_HASH;

        for (position, entry) in self.entries.iter().enumerate() {
            if entry.prev_hash != expected_prev {
                return Err(AuditError::ChainBroken {
                    entry_id: entry.id,
                    position,
                });
            }

            if entry.calculate_hash() != entry.entry_hash {
                return Err(AuditError::EntryTampered {
                    entry_id: entry.id,
                    position,
                });
            }

            expected_prev = entry.entry_hash.as_str();
        }

        Ok(())
    }
}
