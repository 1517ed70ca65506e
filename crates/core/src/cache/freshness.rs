//! Freshness evaluation: the three-way branch between hit, stale, and miss.

use crate::resource::{RevisionDescriptor, StoredRevision};

/// Outcome of comparing stored revisions against the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    /// The newest stored revision is at or ahead of the origin.
    Hit { stored: StoredRevision },
    /// A stored revision exists but the origin has a newer one.
    StaleRefetch { stored: StoredRevision, online: RevisionDescriptor },
    /// Nothing is stored for this resource.
    Miss { online: RevisionDescriptor },
}

impl Freshness {
    /// Decide freshness from the newest stored record and the online revision.
    ///
    /// Stored ids ahead of the origin count as a hit, so an origin serving
    /// stale metadata never forces a refetch.
    pub fn evaluate(latest_stored: Option<StoredRevision>, online: RevisionDescriptor) -> Self {
        match latest_stored {
            Some(stored) if stored.revision_id >= online.id => Freshness::Hit { stored },
            Some(stored) => Freshness::StaleRefetch { stored, online },
            None => Freshness::Miss { online },
        }
    }

    /// Revision id whose content this outcome resolves to.
    pub fn target_revision_id(&self) -> u64 {
        match self {
            Freshness::Hit { stored } => stored.revision_id,
            Freshness::StaleRefetch { online, .. } | Freshness::Miss { online } => online.id,
        }
    }

    pub fn requires_fetch(&self) -> bool {
        !matches!(self, Freshness::Hit { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Freshness::Hit { .. } => "hit",
            Freshness::StaleRefetch { .. } => "stale",
            Freshness::Miss { .. } => "miss",
        }
    }
}

/// The record with the highest revision id, if any.
pub fn latest_stored(records: &[StoredRevision]) -> Option<StoredRevision> {
    records.iter().max_by_key(|r| r.revision_id).cloned()
}
