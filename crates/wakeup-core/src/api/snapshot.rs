//! Last-write-wins holder of the challenge list.

use chrono::{DateTime, Utc};

use super::ChallengeSource;
use crate::challenge::{ChallengeId, ChallengeRecord};

#[derive(Debug, Clone, Default)]
pub struct ChallengeSnapshot {
    records: Vec<ChallengeRecord>,
    updated_at: Option<DateTime<Utc>>,
}

impl ChallengeSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ChallengeRecord>) -> Self {
        let mut snapshot = Self::new();
        snapshot.replace(records);
        snapshot
    }

    /// Overwrite the whole list. Nothing is merged.
    pub fn replace(&mut self, records: Vec<ChallengeRecord>) {
        self.records = records;
        self.touch();
    }

    /// Add a further page, replacing records whose id is already present.
    pub fn append_page(&mut self, page: Vec<ChallengeRecord>) {
        for record in page {
            self.upsert(record);
        }
        self.touch();
    }

    /// Insert or replace a single record (after create or verify).
    pub fn upsert(&mut self, record: ChallengeRecord) {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
        self.touch();
    }

    /// Drop a record (after cancel). Returns whether it was present.
    pub fn remove(&mut self, id: ChallengeId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        let removed = self.records.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.updated_at = None;
    }

    pub fn get(&self, id: ChallengeId) -> Option<&ChallengeRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// When the snapshot last changed; `None` if never loaded.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

impl ChallengeSource for ChallengeSnapshot {
    fn list_challenges(&self) -> &[ChallengeRecord] {
        &self.records
    }
}
