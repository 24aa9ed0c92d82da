//! Day-by-day cumulative percentage indices over a bounded date range.

use crate::categories;
use crate::history::HistoricalTable;
use crate::variation::round2;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// One point of a cumulative index series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexPoint {
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "pct")]
    pub pct: f64,
}

/// A chart over one trailing window: the overall cumulative series plus
/// one series per top category present, all sharing the same date axis and
/// all seeded at 0.0 on the first date in range.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexChart {
    pub total: Vec<IndexPoint>,
    #[serde(rename = "categorias")]
    pub categories: BTreeMap<String, Vec<IndexPoint>>,
}

/// One product's day-over-day change, tagged with the category it belonged
/// to on the earlier day.
struct DayChange<'a> {
    pct: f64,
    prev_top_category: &'a str,
}

/// Builds the chained index over the trailing `max_days` calendar window.
///
/// Unlike a single long-window comparison, which only uses products present
/// on both endpoints, the chained index adds each consecutive-day mean
/// change to a running total that is never reset, so it tolerates products
/// entering and leaving the catalog between any two days. A step where a
/// category matches no products leaves that category's cumulative value
/// unchanged: a flat segment, not a gap.
///
/// With fewer than 2 distinct dates in history the chart is empty. When
/// the calendar window contains fewer than 2 of the available dates, the
/// range widens to the last `max_days` distinct dates regardless of
/// calendar span.
pub fn build_index_chart(table: &HistoricalTable, max_days: i64) -> IndexChart {
    let dates = table.distinct_dates();
    if dates.len() < 2 {
        return IndexChart::default();
    }

    let latest = dates[dates.len() - 1];
    let window_start = latest - Duration::days(max_days);
    let mut range: Vec<NaiveDate> = dates
        .iter()
        .copied()
        .filter(|date| *date >= window_start)
        .collect();
    if range.len() < 2 {
        let keep = dates.len().min(max_days as usize);
        range = dates[dates.len() - keep..].to_vec();
    }

    let first = range[0];
    let seed = IndexPoint { date: first, pct: 0.0 };

    let mut total = vec![seed.clone()];
    let mut total_acc = 0.0;

    struct CategorySeries {
        label: String,
        points: Vec<IndexPoint>,
        acc: f64,
    }
    let mut category_series: Vec<CategorySeries> =
        categories::present_in_display_order(&table.top_categories())
            .into_iter()
            .map(|label| CategorySeries {
                label,
                points: vec![seed.clone()],
                acc: 0.0,
            })
            .collect();

    for pair in range.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        let changes = day_over_day_changes(table, prev, curr);

        if !changes.is_empty() {
            total_acc += changes.iter().map(|change| change.pct).sum::<f64>()
                / changes.len() as f64;
        }
        total.push(IndexPoint {
            date: curr,
            pct: round2(total_acc),
        });

        for series in &mut category_series {
            let subset: Vec<f64> = changes
                .iter()
                .filter(|change| change.prev_top_category == series.label)
                .map(|change| change.pct)
                .collect();
            if !subset.is_empty() {
                series.acc += subset.iter().sum::<f64>() / subset.len() as f64;
            }
            series.points.push(IndexPoint {
                date: curr,
                pct: round2(series.acc),
            });
        }
    }

    IndexChart {
        total,
        categories: category_series
            .into_iter()
            .map(|series| (series.label, series.points))
            .collect(),
    }
}

/// Joins two consecutive dates on product id, restricted to strictly
/// positive prices on both sides. Iterated in the earlier day's row order.
fn day_over_day_changes(
    table: &HistoricalTable,
    prev: NaiveDate,
    curr: NaiveDate,
) -> Vec<DayChange<'_>> {
    let curr_prices = table.price_map(curr);

    let mut changes = Vec::new();
    for record in table.records_on(prev) {
        if record.current_price <= 0.0 {
            continue;
        }
        if let Some(&curr_price) = curr_prices.get(record.product_id.as_str()) {
            if curr_price > 0.0 {
                changes.push(DayChange {
                    pct: (curr_price - record.current_price) / record.current_price * 100.0,
                    prev_top_category: record.top_category.as_str(),
                });
            }
        }
    }
    changes
}
