use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use crate::{Mmsi, VesselRecord};

/// The latest known record of every vessel, keyed by [Mmsi].
///
/// Records are kept in the order their identity was first inserted, replacing a record keeps
/// its slot.
#[derive(Debug, Default, Clone)]
pub struct VesselStateTable {
    records: Vec<VesselRecord>,
    index: HashMap<Mmsi, usize>,
}

impl VesselStateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the record or fully replaces the existing record with the same identity,
    /// returning the replaced record.
    pub fn upsert(&mut self, record: VesselRecord) -> Option<VesselRecord> {
        match self.index.get(&record.mmsi) {
            Some(&slot) => Some(std::mem::replace(&mut self.records[slot], record)),
            None => {
                self.index.insert(record.mmsi.clone(), self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    pub fn get(&self, mmsi: &Mmsi) -> Option<&VesselRecord> {
        self.index.get(mmsi).map(|&slot| &self.records[slot])
    }

    pub fn records(&self) -> &[VesselRecord] {
        &self.records
    }

    /// Copy of all current records.
    pub fn snapshot_all(&self) -> Vec<VesselRecord> {
        self.records.clone()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Removes every record that has not been updated within `ttl` of `now`.
    pub fn evict_stale(&mut self, now: Instant, ttl: Duration) -> Vec<Mmsi> {
        let mut evicted = Vec::new();
        self.records.retain(|r| {
            if now.saturating_duration_since(r.received_at) > ttl {
                evicted.push(r.mmsi.clone());
                false
            } else {
                true
            }
        });

        if !evicted.is_empty() {
            self.index = self
                .records
                .iter()
                .enumerate()
                .map(|(slot, r)| (r.mmsi.clone(), slot))
                .collect();
        }

        evicted
    }
}
