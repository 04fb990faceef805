use std::collections::HashSet;

use crate::Mmsi;

/// Every vessel identity observed during a session, it only ever grows.
#[derive(Debug, Default, Clone)]
pub struct UniqueIdentityTracker {
    seen: HashSet<Mmsi>,
}

impl UniqueIdentityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the identity had not been observed before.
    pub fn observe(&mut self, mmsi: &Mmsi) -> bool {
        if self.seen.contains(mmsi) {
            false
        } else {
            self.seen.insert(mmsi.clone())
        }
    }

    pub fn contains(&self, mmsi: &Mmsi) -> bool {
        self.seen.contains(mmsi)
    }

    pub fn count(&self) -> usize {
        self.seen.len()
    }
}
