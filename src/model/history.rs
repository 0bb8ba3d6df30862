use chrono::{DateTime, Utc};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::model::payroll::PayrollRecord;

/// A record as it sits in the history, with the id it was given on submit.
#[derive(Debug, Clone)]
pub struct PayrollEntry {
    pub id: u64,
    pub submitted_at: DateTime<Utc>,
    pub record: PayrollRecord,
}

#[derive(Debug)]
struct HistoryState {
    next_id: u64,
    entries: Vec<PayrollEntry>,
}

impl Default for HistoryState {
    fn default() -> Self {
        Self {
            next_id: 1,
            entries: Vec::new(),
        }
    }
}

/// Session history of submitted payroll records.
///
/// Created once at startup and handed to the handlers through `web::Data`.
/// Ids start at 1 and are never reused, even across `clear`.
#[derive(Debug, Default)]
pub struct PayrollHistory {
    state: RwLock<HistoryState>,
}

impl PayrollHistory {
    // Entries are only ever pushed whole, so a poisoned lock holds valid data.
    fn read(&self) -> RwLockReadGuard<'_, HistoryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HistoryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn append(&self, record: PayrollRecord) -> PayrollEntry {
        let mut state = self.write();
        let entry = PayrollEntry {
            id: state.next_id,
            submitted_at: Utc::now(),
            record,
        };
        state.next_id += 1;
        state.entries.push(entry.clone());
        entry
    }

    pub fn get(&self, id: u64) -> Option<PayrollEntry> {
        self.read().entries.iter().find(|e| e.id == id).cloned()
    }

    /// All entries in submission order.
    pub fn snapshot(&self) -> Vec<PayrollEntry> {
        self.read().entries.clone()
    }

    /// One 1-based page of entries plus the total entry count.
    pub fn page(&self, page: u32, per_page: u32) -> (Vec<PayrollEntry>, usize) {
        let state = self.read();
        let per_page = per_page.max(1) as usize;
        let offset = (page.max(1) as usize - 1) * per_page;
        let data = state
            .entries
            .iter()
            .skip(offset)
            .take(per_page)
            .cloned()
            .collect();
        (data, state.entries.len())
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry and returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut state = self.write();
        let removed = state.entries.len();
        state.entries.clear();
        removed
    }
}
