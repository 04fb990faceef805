use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::debug;

use crate::{
    NewVesselPosition, Snapshot, UniqueIdentityTracker, VesselRecord, VesselStateTable, project,
};

/// Owns all per-session vessel state and decides when a new [Snapshot] is due.
///
/// Updates mark the state dirty, [Coalescer::tick] produces at most one snapshot per call and
/// only if something changed since the previous one. Any number of updates to a vessel between
/// two ticks therefore surface as a single snapshot holding its latest state.
#[derive(Debug, Default)]
pub struct Coalescer {
    table: VesselStateTable,
    tracker: UniqueIdentityTracker,
    vessel_ttl: Option<Duration>,
    dirty: bool,
    sequence: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    /// The vessel had not been observed before in this session.
    pub new_vessel: bool,
    /// A previous record for the vessel was replaced.
    pub replaced: bool,
}

impl Coalescer {
    /// `vessel_ttl` enables eviction of vessels that have not reported within the given
    /// duration, `None` keeps every vessel for the lifetime of the session.
    pub fn new(vessel_ttl: Option<Duration>) -> Self {
        Self {
            vessel_ttl,
            ..Default::default()
        }
    }

    pub fn apply(&mut self, position: NewVesselPosition, received_at: Instant) -> Applied {
        let new_vessel = self.tracker.observe(&position.mmsi);
        let replaced = self
            .table
            .upsert(VesselRecord::new(position, received_at))
            .is_some();
        self.dirty = true;

        Applied {
            new_vessel,
            replaced,
        }
    }

    pub fn tick(&mut self, now: Instant) -> Option<Snapshot> {
        if let Some(ttl) = self.vessel_ttl {
            let evicted = self.table.evict_stale(now, ttl);
            if !evicted.is_empty() {
                debug!(num_evicted = evicted.len(), "evicted stale vessels");
                self.dirty = true;
            }
        }

        if !self.dirty {
            return None;
        }

        self.dirty = false;
        self.sequence += 1;

        Some(Snapshot {
            sequence: self.sequence,
            generated_at: Utc::now(),
            unique_vessels: self.tracker.count(),
            vessels: project(self.table.records()),
        })
    }

    /// Forces the next tick to emit, used when a produced snapshot never reached its consumer.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn unique_vessels(&self) -> usize {
        self.tracker.count()
    }

    pub fn table(&self) -> &VesselStateTable {
        &self.table
    }

    pub fn tracker(&self) -> &UniqueIdentityTracker {
        &self.tracker
    }
}
