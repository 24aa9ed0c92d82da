//! Persistence for the historical table: a single CSV file, loaded at the
//! start of a run and rewritten whole at the end.

use crate::history::HistoricalTable;
use crate::record::PriceRecord;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Handle on the persisted historical price table.
///
/// The store is a single-writer resource per run; concurrent runs against
/// the same path must be serialized by the caller.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Creates a store handle. The file is not touched until the first
    /// [`HistoryStore::load_or_empty`] or [`HistoryStore::save`].
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        HistoryStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted table, or an empty one when the file is missing
    /// or unreadable.
    ///
    /// A missing store is the legitimate first-run state; an unreadable one
    /// is logged and treated the same way, bootstrapping from empty
    /// history instead of failing the run.
    pub fn load_or_empty(&self) -> HistoricalTable {
        if !self.path.exists() {
            return HistoricalTable::new();
        }

        match self.read_records() {
            Ok(records) => HistoricalTable::from_records(records),
            Err(err) => {
                tracing::warn!(
                    "historical store {} unreadable ({}), starting from empty history",
                    self.path.display(),
                    err
                );
                HistoricalTable::new()
            }
        }
    }

    fn read_records(&self) -> Result<Vec<PriceRecord>, StoreError> {
        let file = File::open(&self.path)?;
        let mut reader = csv::Reader::from_reader(file);
        let mut records = Vec::new();
        for result in reader.deserialize() {
            records.push(result?);
        }
        Ok(records)
    }

    /// Persists the table as the new durable baseline, overwriting the
    /// previous file.
    pub fn save(&self, table: &HistoricalTable) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(&self.path)?;
        let mut writer = csv::Writer::from_writer(file);
        for record in table.records() {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Errors raised while reading or writing the historical store.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(err) => write!(f, "store I/O error: {}", err),
            StoreError::Csv(err) => write!(f, "store CSV error: {}", err),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(err) => Some(err),
            StoreError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<csv::Error> for StoreError {
    fn from(err: csv::Error) -> Self {
        StoreError::Csv(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::NormalizedSnapshot;
    use chrono::NaiveDate;

    fn record(product_id: &str, price: f64) -> PriceRecord {
        PriceRecord {
            product_id: product_id.to_string(),
            name: "Yerba Mate 500g".to_string(),
            brand: "Marca".to_string(),
            category: "Yerbas".to_string(),
            top_category: "Almacén".to_string(),
            current_price: price,
            list_price: price,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn missing_file_loads_as_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("precios_compacto.csv"));
        assert!(store.load_or_empty().is_empty());
    }

    #[test]
    fn malformed_file_loads_as_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("precios_compacto.csv");
        std::fs::write(&path, "not,a,price\ntable at all").unwrap();

        let store = HistoryStore::new(&path);
        assert!(store.load_or_empty().is_empty());
    }

    #[test]
    fn save_then_load_round_trips_the_table() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("precios_compacto.csv"));

        let mut table = HistoricalTable::new();
        table.merge_day(NormalizedSnapshot {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            records: vec![record("1", 100.0), record("2", 55.5)],
        });

        store.save(&table).unwrap();
        let loaded = store.load_or_empty();
        assert_eq!(loaded, table);
    }

    #[test]
    fn save_overwrites_the_previous_baseline() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("precios_compacto.csv"));

        let mut table = HistoricalTable::new();
        table.merge_day(NormalizedSnapshot {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            records: vec![record("1", 100.0)],
        });
        store.save(&table).unwrap();

        table.merge_day(NormalizedSnapshot {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            records: vec![record("1", 110.0)],
        });
        store.save(&table).unwrap();

        assert_eq!(store.load_or_empty().len(), 2);
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("data").join("precios_compacto.csv"));
        store.save(&HistoricalTable::new()).unwrap();
        assert!(store.path().exists());
    }
}
