//! The daily published summary: headline variations, movement counts and
//! the per-category breakdown.

use crate::categories;
use crate::history::HistoricalTable;
use crate::periods;
use crate::ranking::RankingEntry;
use crate::variation::period_variation;
use chrono::NaiveDate;
use serde::Serialize;

/// Per-top-category block of the daily summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDaySummary {
    #[serde(rename = "categoria")]
    pub category: String,
    /// Day variation over the category slice; 0 when not yet computable.
    /// This is the one place an undefined result is substituted for
    /// display, and the substitution is part of the data contract.
    #[serde(rename = "variacion_pct_promedio")]
    pub variation_pct: f64,
    #[serde(rename = "productos_subieron")]
    pub products_up: usize,
    #[serde(rename = "productos_bajaron")]
    pub products_down: usize,
    /// Size of the day-over-day join for this category.
    #[serde(rename = "total_productos")]
    pub total_products: usize,
}

/// The daily published snapshot, read by the presentation layer and the
/// social publisher. Field names are the public data contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    #[serde(rename = "fecha_actualizacion")]
    pub updated_on: NaiveDate,
    /// Products observed on the latest date.
    #[serde(rename = "total_productos")]
    pub total_products: usize,
    /// Mean day-over-day change; `null` until two dates exist. The social
    /// publisher skips the day entirely when this is absent.
    #[serde(rename = "variacion_dia")]
    pub day_variation: Option<f64>,
    #[serde(rename = "variacion_mes")]
    pub month_variation: Option<f64>,
    #[serde(rename = "variacion_anio")]
    pub year_variation: Option<f64>,
    #[serde(rename = "productos_subieron_dia")]
    pub products_up: usize,
    #[serde(rename = "productos_bajaron_dia")]
    pub products_down: usize,
    #[serde(rename = "productos_sin_cambio_dia")]
    pub products_flat: usize,
    /// Present categories only, in display order.
    #[serde(rename = "categorias_dia")]
    pub categories: Vec<CategoryDaySummary>,
    /// Day losers truncated for the publisher, attached by the pipeline.
    #[serde(rename = "ranking_baja_dia")]
    pub top_losers: Vec<RankingEntry>,
}

/// Strict up/down/flat counts over the join of `latest` against
/// `previous`, ignoring non-positive prices on either side.
fn up_down_flat(
    table: &HistoricalTable,
    latest: NaiveDate,
    previous: NaiveDate,
) -> (usize, usize, usize) {
    let previous_prices = table.price_map(previous);

    let mut up = 0usize;
    let mut down = 0usize;
    let mut flat = 0usize;
    for record in table.records_on(latest) {
        if record.current_price <= 0.0 {
            continue;
        }
        if let Some(&prev_price) = previous_prices.get(record.product_id.as_str()) {
            if prev_price <= 0.0 {
                continue;
            }
            if record.current_price > prev_price {
                up += 1;
            } else if record.current_price < prev_price {
                down += 1;
            } else {
                flat += 1;
            }
        }
    }
    (up, down, flat)
}

/// Composes the daily summary from the merged table. Returns `None` only
/// when the table holds no dates at all.
///
/// The day-over-day comparison always uses the previous **available**
/// date, not a fixed calendar offset; until a second date exists every
/// variation is `null` and every count is zero.
pub fn build_summary(table: &HistoricalTable) -> Option<DailySummary> {
    let dates = table.distinct_dates();
    let latest = *dates.last()?;
    let previous = if dates.len() >= 2 {
        Some(dates[dates.len() - 2])
    } else {
        None
    };

    let (products_up, products_down, products_flat) = match previous {
        Some(previous) => up_down_flat(table, latest, previous),
        None => (0, 0, 0),
    };

    let mut category_blocks = Vec::new();
    for label in categories::present_in_display_order(&table.top_categories()) {
        let slice = table.category_slice(&label);
        let variation = period_variation(&slice, periods::DAY);

        let (cat_up, cat_down, cat_flat) = match previous {
            Some(previous) => up_down_flat(&slice, latest, previous),
            None => (0, 0, 0),
        };

        category_blocks.push(CategoryDaySummary {
            category: label,
            variation_pct: variation.unwrap_or(0.0),
            products_up: cat_up,
            products_down: cat_down,
            total_products: cat_up + cat_down + cat_flat,
        });
    }

    Some(DailySummary {
        updated_on: latest,
        total_products: table.count_on(latest),
        day_variation: period_variation(table, periods::DAY),
        month_variation: period_variation(table, periods::MONTH),
        year_variation: period_variation(table, periods::YEAR),
        products_up,
        products_down,
        products_flat,
        categories: category_blocks,
        top_losers: Vec::new(),
    })
}
