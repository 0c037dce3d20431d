use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use shared::domain::{DispenseId, DispenseOutcome, DispenseRecord, DispensedItem, SubjectId};
use tracing::debug;

pub const DEFAULT_AUDIT_RING_SIZE: usize = 50;

#[derive(Debug, Clone)]
pub struct NewDispense {
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub items: Vec<DispensedItem>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct AuditReceipt {
    record: DispenseRecord,
    evicted: Option<DispenseRecord>,
}

impl AuditReceipt {
    pub fn id(&self) -> DispenseId {
        self.record.id
    }

    /// The record as appended.
    pub fn record(&self) -> &DispenseRecord {
        &self.record
    }
}

/// Append-only ring of dispense records, oldest evicted first.
#[derive(Debug, Clone)]
pub struct AuditLog {
    capacity: usize,
    entries: VecDeque<DispenseRecord>,
    next_id: u64,
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new(DEFAULT_AUDIT_RING_SIZE)
    }
}

impl AuditLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
            next_id: 1,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn append(&mut self, entry: NewDispense) -> AuditReceipt {
        let id = DispenseId(self.next_id);
        self.next_id += 1;

        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        if let Some(old) = &evicted {
            debug!(evicted = old.id.0, "audit: ring full, oldest evicted");
        }

        let record = DispenseRecord {
            id,
            subject_id: entry.subject_id,
            subject_name: entry.subject_name,
            items: entry.items,
            timestamp: entry.timestamp,
            outcome: DispenseOutcome::Completed,
        };
        self.entries.push_back(record.clone());
        AuditReceipt { record, evicted }
    }

    /// Undoes the most recent append, putting back anything it evicted.
    /// Returns `None` when the receipt is not for the newest entry.
    pub fn retract(&mut self, receipt: AuditReceipt) -> Option<DispenseRecord> {
        let id = receipt.id();
        if self.entries.back().map(|record| record.id) != Some(id) {
            return None;
        }
        let removed = self.entries.pop_back();
        if let Some(evicted) = receipt.evicted {
            self.entries.push_front(evicted);
        }
        if id.0 + 1 == self.next_id {
            self.next_id = id.0;
        }
        debug!(id = id.0, "audit: append retracted");
        removed
    }

    pub fn get(&self, id: DispenseId) -> Option<&DispenseRecord> {
        self.entries.iter().find(|record| record.id == id)
    }

    /// Up to `limit` records, newest first.
    pub fn recent(&self, limit: usize) -> Vec<DispenseRecord> {
        self.entries.iter().rev().take(limit).cloned().collect()
    }
}

#[cfg(test)]
#[path = "tests/audit_tests.rs"]
mod tests;
