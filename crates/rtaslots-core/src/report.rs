//! Crawl result aggregation.
//!
//! The aggregator owns the run-wide mapping from location name to that
//! location's accumulated day→slots data. Entries are recorded exactly once
//! per location per run (a later `record` for the same name replaces the
//! earlier one), and an empty entry is meaningful: it says the location was
//! checked and nothing was found, as opposed to never having been reached.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Weekday label → ordered time-slot display strings for that day.
/// Days with no slots are omitted rather than zero-filled.
pub type DaySlots = BTreeMap<String, Vec<String>>;

/// How a week's extraction is folded into a location's accumulated result
/// when a weekday label recurs across week windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// A later week's slots replace the day's earlier slots.
    Overwrite,
    /// A later week's slots are appended to the day's ordered slot list.
    Append,
}

impl MergePolicy {
    pub fn merge(self, into: &mut DaySlots, week: DaySlots) {
        for (day, slots) in week {
            match self {
                MergePolicy::Overwrite => {
                    into.insert(day, slots);
                }
                MergePolicy::Append => {
                    into.entry(day).or_default().extend(slots);
                }
            }
        }
    }
}

/// The single externally-visible artifact of a crawl run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub locations: BTreeMap<String, DaySlots>,
}

/// Accumulates per-location results over the lifetime of one run.
#[derive(Debug, Default)]
pub struct Aggregator {
    locations: BTreeMap<String, DaySlots>,
}

impl Aggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the finished result for one location. Idempotent
    /// overwrite-by-key: a later call for the same name replaces the
    /// earlier entry.
    pub fn record(&mut self, location: impl Into<String>, slots: DaySlots) {
        self.locations.insert(location.into(), slots);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Snapshot the accumulated results into the final report, stamping run
    /// metadata. Consumes the aggregator; nothing can be recorded afterwards.
    #[must_use]
    pub fn finalize(self) -> CrawlReport {
        CrawlReport {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            locations: self.locations,
        }
    }
}
