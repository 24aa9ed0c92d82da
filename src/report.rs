//! Published JSON artifacts.

use crate::history::HistoricalTable;
use crate::index_series::{build_index_chart, IndexChart};
use crate::periods;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// The chart bundle published as `graficos.json`: one cumulative index
/// chart per lookback label.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSet {
    #[serde(rename = "7d")]
    pub week: IndexChart,
    #[serde(rename = "30d")]
    pub month: IndexChart,
    #[serde(rename = "6m")]
    pub half_year: IndexChart,
    #[serde(rename = "1y")]
    pub year: IndexChart,
}

impl ChartSet {
    /// Builds every published chart window from the merged table.
    pub fn build(table: &HistoricalTable) -> Self {
        ChartSet {
            week: build_index_chart(table, periods::WEEK),
            month: build_index_chart(table, periods::MONTH),
            half_year: build_index_chart(table, periods::HALF_YEAR),
            year: build_index_chart(table, periods::YEAR),
        }
    }
}

/// Errors raised while writing published artifacts.
#[derive(Debug)]
pub enum ReportError {
    Io(std::io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Io(err) => write!(f, "report I/O error: {}", err),
            ReportError::Serialize(err) => write!(f, "report serialization error: {}", err),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Io(err) => Some(err),
            ReportError::Serialize(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::Io(err)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Serialize(err)
    }
}

/// Writes one artifact as pretty-printed JSON into `dir`, creating the
/// directory if needed. Non-Latin text is preserved verbatim; nothing is
/// ASCII-escaped.
pub fn write_json<T: Serialize>(dir: &Path, name: &str, value: &T) -> Result<(), ReportError> {
    fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(value)?;
    fs::write(dir.join(name), json)?;
    Ok(())
}
