pub mod query;
pub mod range;
pub mod record;

use record::{ActivityRecord, DedupKey};
use std::collections::HashSet;

pub use query::{ActivityQuery, SearchTarget, ACTIVITY_QUERIES};
pub use range::DateRange;

/// Records collected during one run, in fetch order, with duplicates
/// (same [`DedupKey`]) dropped on insert.
#[derive(Debug, Default)]
pub struct ActivityLog {
    records: Vec<ActivityRecord>,
    seen: HashSet<DedupKey>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when an equivalent record was already recorded.
    pub fn add(&mut self, record: ActivityRecord) -> bool {
        if !self.seen.insert(record.dedup_key()) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn into_records(self) -> Vec<ActivityRecord> {
        self.records
    }
}
