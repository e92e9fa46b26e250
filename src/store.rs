// Copyright 2026 Hypermesh Foundation. All rights reserved.
// VISION 2060 Survey Engine - Response Store

//! Persistence seam for respondent records.
//!
//! The session only needs keyed read, atomic per-email read-modify-write and
//! an administrative reset; any database can sit behind [`ResponseStore`].
//! [`MemoryStore`] is the in-process implementation.

use std::io::{BufRead, Write};

use dashmap::DashMap;

use crate::response::StoredResponse;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no response record for {0}")]
    NotFound(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Keyed storage of [`StoredResponse`] records.
///
/// Implementations must serialize `upsert` and `update` per email so that
/// concurrent updates for one respondent are never lost.
pub trait ResponseStore: Send + Sync {
    fn fetch(&self, email: &str) -> Result<Option<StoredResponse>, StoreError>;

    /// Insert `seed()` if no record exists for `email`, then apply `update`.
    /// Returns the record as stored afterwards.
    fn upsert(
        &self,
        email: &str,
        seed: &dyn Fn() -> StoredResponse,
        update: &mut dyn FnMut(&mut StoredResponse),
    ) -> Result<StoredResponse, StoreError>;

    /// Apply `update` to an existing record.
    fn update(
        &self,
        email: &str,
        update: &mut dyn FnMut(&mut StoredResponse),
    ) -> Result<StoredResponse, StoreError>;

    /// All records ordered by email.
    fn all(&self) -> Result<Vec<StoredResponse>, StoreError>;

    /// Administrative reset. Returns the number of records removed.
    fn clear(&self) -> Result<usize, StoreError>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Records held in a sharded concurrent map; the per-key write guard makes
/// each upsert/update atomic for that respondent.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<String, StoredResponse>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Load records previously written by [`export_jsonl`]. Later lines win
    /// for duplicate emails.
    pub fn import_jsonl<R: BufRead>(&self, reader: R) -> Result<usize, StoreError> {
        let mut count = 0;
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: StoredResponse = serde_json::from_str(&line)?;
            self.records.insert(record.email.clone(), record);
            count += 1;
        }
        Ok(count)
    }
}

impl ResponseStore for MemoryStore {
    fn fetch(&self, email: &str) -> Result<Option<StoredResponse>, StoreError> {
        Ok(self.records.get(email).map(|r| r.value().clone()))
    }

    fn upsert(
        &self,
        email: &str,
        seed: &dyn Fn() -> StoredResponse,
        update: &mut dyn FnMut(&mut StoredResponse),
    ) -> Result<StoredResponse, StoreError> {
        let mut entry = self.records.entry(email.to_string()).or_insert_with(seed);
        update(entry.value_mut());
        Ok(entry.value().clone())
    }

    fn update(
        &self,
        email: &str,
        update: &mut dyn FnMut(&mut StoredResponse),
    ) -> Result<StoredResponse, StoreError> {
        let mut entry = self
            .records
            .get_mut(email)
            .ok_or_else(|| StoreError::NotFound(email.to_string()))?;
        update(entry.value_mut());
        Ok(entry.value().clone())
    }

    fn all(&self) -> Result<Vec<StoredResponse>, StoreError> {
        let mut records: Vec<StoredResponse> =
            self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(records)
    }

    fn clear(&self) -> Result<usize, StoreError> {
        let removed = self.records.len();
        self.records.clear();
        tracing::warn!(removed, "response store cleared");
        Ok(removed)
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Write every record as one JSON line, ordered by email.
pub fn export_jsonl<W: Write>(store: &dyn ResponseStore, mut out: W) -> Result<usize, StoreError> {
    let records = store.all()?;
    for record in &records {
        serde_json::to_writer(&mut out, record)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(records.len())
}
