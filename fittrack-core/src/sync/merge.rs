//! Reconciles remote entries into the local store.

use super::remote::RemoteEntry;
use crate::models::DailyLogEntry;
use crate::store::FitnessStore;

/// What a merge did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub inserted: usize,
    pub updated: usize,
    pub kept: usize,
}

impl MergeStats {
    pub fn changed(&self) -> usize {
        self.inserted + self.updated
    }
}

/// Whether a remote entry replaces the local one for the same date.
///
/// A remote entry wins when the local workout is not completed yet, or when
/// it is strictly newer. Ties keep the local entry.
pub fn remote_wins(local: &DailyLogEntry, remote: &DailyLogEntry) -> bool {
    !local.workout_completed || remote.updated_at > local.updated_at
}

/// Merges `remote` entries into `store` by date.
///
/// An overwrite keeps the local parts the remote rows did not carry.
pub fn merge_remote(store: &mut FitnessStore, remote: Vec<RemoteEntry>) -> MergeStats {
    let mut stats = MergeStats::default();

    for incoming in remote {
        match store.find_by_date(incoming.entry.date) {
            None => {
                store.save(incoming.entry);
                stats.inserted += 1;
            }
            Some(local) if remote_wins(local, &incoming.entry) => {
                let merged = incoming.fill_from(local);
                store.save(merged);
                stats.updated += 1;
            }
            Some(_) => stats.kept += 1,
        }
    }

    stats
}
