//! One whole-day batch run: ingest the crawler's raw files, fold them into
//! the historical store and publish the derived artifacts.

use crate::history::HistoricalTable;
use crate::normalize::{normalize_rows, RawPriceRow};
use crate::periods;
use crate::ranking::{top_movers, Movers, DEFAULT_TOP_N};
use crate::report::{self, ChartSet, ReportError};
use crate::store::{HistoryStore, StoreError};
use crate::summary::{build_summary, DailySummary};
use chrono::NaiveDate;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Filename prefix the crawler uses for raw per-day snapshot files.
const RAW_FILE_PREFIX: &str = "precios";

/// Filename of the persisted historical table inside the data directory.
const STORE_FILE: &str = "precios_compacto.csv";

/// Number of losers attached to the summary for the publisher.
const SUMMARY_LOSERS: usize = 10;

/// Configuration for one daily run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory the crawler writes `precios_YYYYMMDD*.csv` files into.
    pub input_dir: PathBuf,
    /// Directory holding the historical store and the published artifacts.
    pub data_dir: PathBuf,
    /// The calendar date this run ingests.
    pub date: NaiveDate,
}

impl RunConfig {
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE)
    }
}

/// Errors that abort a daily run.
#[derive(Debug)]
pub enum RunError {
    /// The crawler produced no usable rows for the run date. The run stops
    /// before any merge, leaving the persisted store untouched.
    NoInputData,
    Store(StoreError),
    Report(ReportError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::NoInputData => write!(f, "no usable input rows for the run date"),
            RunError::Store(err) => write!(f, "{}", err),
            RunError::Report(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::NoInputData => None,
            RunError::Store(err) => Some(err),
            RunError::Report(err) => Some(err),
        }
    }
}

impl From<StoreError> for RunError {
    fn from(err: StoreError) -> Self {
        RunError::Store(err)
    }
}

impl From<ReportError> for RunError {
    fn from(err: ReportError) -> Self {
        RunError::Report(err)
    }
}

/// Reads and concatenates every raw snapshot file for the run date.
///
/// The crawler may split one day across several files; they are read in
/// filename order. A file that cannot be read or parsed is skipped with a
/// warning rather than failing the run.
pub fn load_raw_rows(input_dir: &Path, date: NaiveDate) -> Vec<RawPriceRow> {
    let prefix = format!("{}_{}", RAW_FILE_PREFIX, date.format("%Y%m%d"));

    let entries = match fs::read_dir(input_dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!("cannot read input directory {}: {}", input_dir.display(), err);
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with(&prefix) && name.ends_with(".csv"))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();

    let mut rows = Vec::new();
    for path in paths {
        match read_rows(&path) {
            Ok(mut file_rows) => {
                tracing::info!("loaded {} ({} rows)", path.display(), file_rows.len());
                rows.append(&mut file_rows);
            }
            Err(err) => {
                tracing::warn!("skipping unreadable snapshot file {}: {}", path.display(), err);
            }
        }
    }
    rows
}

fn read_rows(path: &Path) -> Result<Vec<RawPriceRow>, csv::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

/// Executes one whole-day batch: ingest, merge, persist, derive, publish.
///
/// The run is a pure function of the previously persisted table and the
/// day's snapshot. Nothing is written until the snapshot is known to be
/// non-empty; insufficient history downgrades individual figures to
/// `null`/empty instead of failing the run.
pub fn run_daily(config: &RunConfig) -> Result<DailySummary, RunError> {
    let raw = load_raw_rows(&config.input_dir, config.date);
    let snapshot = normalize_rows(raw, config.date);
    if snapshot.is_empty() {
        return Err(RunError::NoInputData);
    }
    tracing::info!(
        "normalized snapshot for {}: {} products",
        config.date,
        snapshot.len()
    );

    let store = HistoryStore::new(config.store_path());
    let mut table = store.load_or_empty();
    table.merge_day(snapshot);
    store.save(&table)?;
    tracing::info!("historical store updated: {} rows", table.len());

    let mut summary = build_summary(&table).ok_or(RunError::NoInputData)?;
    let charts = ChartSet::build(&table);

    let day = movers_or_empty(&table, periods::DAY);
    let month = movers_or_empty(&table, periods::MONTH);
    let year = movers_or_empty(&table, periods::YEAR);

    summary.top_losers = day.losers.iter().take(SUMMARY_LOSERS).cloned().collect();

    report::write_json(&config.data_dir, "resumen.json", &summary)?;
    report::write_json(&config.data_dir, "graficos.json", &charts)?;
    report::write_json(&config.data_dir, "ranking_dia.json", &day.gainers)?;
    report::write_json(&config.data_dir, "ranking_baja_dia.json", &day.losers)?;
    report::write_json(&config.data_dir, "ranking_mes.json", &month.gainers)?;
    report::write_json(&config.data_dir, "ranking_baja_mes.json", &month.losers)?;
    report::write_json(&config.data_dir, "ranking_anio.json", &year.gainers)?;
    report::write_json(&config.data_dir, "ranking_baja_anio.json", &year.losers)?;

    Ok(summary)
}

/// An undefined ranking period publishes as empty lists, so downstream
/// always finds a valid document.
fn movers_or_empty(table: &HistoricalTable, lookback_days: i64) -> Movers {
    top_movers(table, lookback_days, DEFAULT_TOP_N).unwrap_or_default()
}
