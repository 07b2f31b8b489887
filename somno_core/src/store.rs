//! In-memory sleep entry store.
//!
//! The store exclusively owns the entry collection and the goals record. It
//! is an explicit state object: construct it from a [`Snapshot`], mutate it
//! through the operations below, and hand [`SleepStore::snapshot`] back to the
//! persistence boundary when done. After every mutation the collection is
//! sorted by date descending (stable, ties by insertion order).

use crate::duration::compute_duration;
use crate::{
    Error, Result, SleepEntry, SleepEntryDraft, SleepEntryUpdate, SleepGoals, SleepGoalsUpdate,
    Snapshot,
};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

/// Owns the entry collection and goal state for one user.
#[derive(Clone, Debug, Default)]
pub struct SleepStore {
    entries: Vec<SleepEntry>,
    goals: SleepGoals,
}

impl SleepStore {
    /// Create an empty store with the given initial goals.
    pub fn new(goals: SleepGoals) -> Self {
        Self {
            entries: Vec::new(),
            goals,
        }
    }

    /// Restore a store from a persisted snapshot.
    ///
    /// The sort invariant is re-established here so a hand-edited or
    /// older-format snapshot can't smuggle in an unsorted collection.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut store = Self {
            entries: snapshot.entries,
            goals: snapshot.goals,
        };
        store.sort_entries();
        store
    }

    /// The serializable `{entries, goals}` shape for the persistence boundary.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            entries: self.entries.clone(),
            goals: self.goals.clone(),
        }
    }

    /// All entries, date-descending.
    pub fn entries(&self) -> &[SleepEntry] {
        &self.entries
    }

    /// The most-recent-`n` window used by the aggregation functions.
    pub fn recent(&self, n: usize) -> &[SleepEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn goals(&self) -> &SleepGoals {
        &self.goals
    }

    /// Add a new entry, deriving id, duration and timestamps.
    ///
    /// The store owns the one-entry-per-date invariant: a draft whose date is
    /// already logged is rejected with [`Error::DuplicateDate`].
    pub fn add_entry(&mut self, draft: SleepEntryDraft) -> Result<SleepEntry> {
        if self.entries.iter().any(|e| e.date == draft.date) {
            return Err(Error::DuplicateDate(draft.date));
        }

        let now = Utc::now();
        let entry = SleepEntry {
            id: Uuid::new_v4(),
            date: draft.date,
            bedtime: draft.bedtime,
            wake_time: draft.wake_time,
            quality: draft.quality,
            notes: draft.notes,
            duration: compute_duration(draft.bedtime, draft.wake_time),
            created_at: now,
            updated_at: now,
        };

        tracing::debug!("Added entry {} for {}", entry.id, entry.date);
        self.entries.push(entry.clone());
        self.sort_entries();
        Ok(entry)
    }

    /// Merge an update into the matching entry.
    ///
    /// Recomputes `duration` if either time field changed and refreshes
    /// `updated_at`. Moving the entry onto a date already held by another
    /// entry is rejected with [`Error::DuplicateDate`], the same invariant
    /// `add_entry` enforces. Returns `Ok(None)` if the id is unknown; in
    /// both non-success cases the collection is left untouched.
    pub fn update_entry(
        &mut self,
        id: Uuid,
        update: SleepEntryUpdate,
    ) -> Result<Option<SleepEntry>> {
        let idx = match self.entries.iter().position(|e| e.id == id) {
            Some(idx) => idx,
            None => return Ok(None),
        };

        if let Some(new_date) = update.date {
            if self.entries.iter().any(|e| e.id != id && e.date == new_date) {
                return Err(Error::DuplicateDate(new_date));
            }
        }

        let entry = &mut self.entries[idx];

        let times_changed = update.bedtime.is_some() || update.wake_time.is_some();
        let date_changed = update.date.is_some();

        if let Some(date) = update.date {
            entry.date = date;
        }
        if let Some(bedtime) = update.bedtime {
            entry.bedtime = bedtime;
        }
        if let Some(wake_time) = update.wake_time {
            entry.wake_time = wake_time;
        }
        if let Some(quality) = update.quality {
            entry.quality = quality;
        }
        if let Some(notes) = update.notes {
            entry.notes = notes;
        }

        if times_changed {
            entry.duration = compute_duration(entry.bedtime, entry.wake_time);
        }
        entry.updated_at = Utc::now();

        let updated = entry.clone();
        if date_changed {
            self.sort_entries();
        }
        tracing::debug!("Updated entry {}", id);
        Ok(Some(updated))
    }

    /// Remove the matching entry. Returns `false` if the id is unknown.
    pub fn delete_entry(&mut self, id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let removed = self.entries.len() < before;
        if removed {
            tracing::debug!("Deleted entry {}", id);
        }
        removed
    }

    /// Entries with `date` in `[start, end]` inclusive, in store order.
    pub fn entries_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<&SleepEntry> {
        self.entries
            .iter()
            .filter(|e| e.date >= start && e.date <= end)
            .collect()
    }

    /// Look up one entry by id.
    pub fn entry(&self, id: Uuid) -> Option<&SleepEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Partial-merge update of the goals record.
    pub fn update_goals(&mut self, update: SleepGoalsUpdate) {
        if let Some(target) = update.target_sleep_duration {
            self.goals.target_sleep_duration = target;
        }
        if let Some(enabled) = update.reminder_enabled {
            self.goals.reminder_enabled = enabled;
        }
        if let Some(minutes) = update.reminder_minutes_before {
            self.goals.reminder_minutes_before = minutes;
        }
    }

    fn sort_entries(&mut self) {
        // Stable: equal dates keep their insertion order
        self.entries.sort_by(|a, b| b.date.cmp(&a.date));
    }
}
