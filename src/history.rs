//! The historical price table and the daily merge that grows it.

use crate::normalize::NormalizedSnapshot;
use crate::record::PriceRecord;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap, HashSet};

/// The growing historical table, conceptually keyed by `(product_id, date)`.
///
/// At most one row exists per product and day: merging a day that is
/// already present replaces that day's rows instead of appending
/// duplicates. Rows for other dates are never touched and never deleted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricalTable {
    records: Vec<PriceRecord>,
}

impl HistoricalTable {
    /// Creates an empty table (the first-run state).
    pub fn new() -> Self {
        HistoricalTable::default()
    }

    /// Wraps rows loaded from the persisted store.
    pub fn from_records(records: Vec<PriceRecord>) -> Self {
        HistoricalTable { records }
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Folds one day's snapshot into the table.
    ///
    /// Existing rows with the snapshot's date are removed first, then the
    /// snapshot is appended, so re-ingesting the same day is idempotent.
    pub fn merge_day(&mut self, snapshot: NormalizedSnapshot) {
        self.records.retain(|record| record.date != snapshot.date);
        self.records.extend(snapshot.records);
    }

    /// Distinct dates present in the table, ascending.
    pub fn distinct_dates(&self) -> Vec<NaiveDate> {
        let dates: BTreeSet<NaiveDate> = self.records.iter().map(|record| record.date).collect();
        dates.into_iter().collect()
    }

    /// Rows observed on `date`, in table order. Iterating the table side of
    /// a join in row order keeps every aggregate reproducible run to run.
    pub fn records_on(&self, date: NaiveDate) -> impl Iterator<Item = &PriceRecord> {
        self.records.iter().filter(move |record| record.date == date)
    }

    /// Number of rows observed on `date`.
    pub fn count_on(&self, date: NaiveDate) -> usize {
        self.records_on(date).count()
    }

    /// Price per product on `date`. On (unexpected) duplicates the later
    /// row wins, consistent with snapshot deduplication.
    pub fn price_map(&self, date: NaiveDate) -> HashMap<&str, f64> {
        self.records_on(date)
            .map(|record| (record.product_id.as_str(), record.current_price))
            .collect()
    }

    /// Top categories present anywhere in the table.
    pub fn top_categories(&self) -> HashSet<String> {
        self.records
            .iter()
            .map(|record| record.top_category.clone())
            .collect()
    }

    /// The sub-table holding one top category's rows. Analytics run on the
    /// slice exactly as they do on the whole table, including date
    /// resolution within the slice's own dates.
    pub fn category_slice(&self, top_category: &str) -> HistoricalTable {
        HistoricalTable {
            records: self
                .records
                .iter()
                .filter(|record| record.top_category == top_category)
                .cloned()
                .collect(),
        }
    }
}
