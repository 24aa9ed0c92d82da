pub mod categories;
pub mod history;
pub mod index_series;
pub mod normalize;
pub mod periods;
pub mod pipeline;
pub mod ranking;
pub mod record;
pub mod report;
pub mod store;
pub mod summary;
pub mod variation;


pub use history::HistoricalTable;
pub use index_series::{build_index_chart, IndexChart, IndexPoint};
pub use normalize::{normalize_rows, NormalizedSnapshot, RawPriceRow};
pub use periods::{resolve_period, PeriodEndpoints};
pub use pipeline::{load_raw_rows, run_daily, RunConfig, RunError};
pub use ranking::{top_movers, Movers, RankingEntry, DEFAULT_TOP_N};
pub use record::PriceRecord;
pub use report::{write_json, ChartSet, ReportError};
pub use store::{HistoryStore, StoreError};
pub use summary::{build_summary, CategoryDaySummary, DailySummary};
pub use variation::period_variation;
