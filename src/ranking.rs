//! Top-N gainer and loser rankings over a lookback window.

use crate::history::HistoricalTable;
use crate::periods;
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::cmp::Reverse;

/// Default number of entries kept on each side of a ranking.
pub const DEFAULT_TOP_N: usize = 20;

/// One product's movement over a period, as published in the ranking
/// artifacts. `diff_pct` is left unrounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    #[serde(rename = "sku_id")]
    pub product_id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "marca")]
    pub brand: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "precio_hoy")]
    pub price_now: f64,
    #[serde(rename = "precio_ref")]
    pub price_ref: f64,
    #[serde(rename = "diff_pct")]
    pub pct_change: f64,
}

/// The two sides of a ranking: largest gains first, largest drops first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Movers {
    pub gainers: Vec<RankingEntry>,
    pub losers: Vec<RankingEntry>,
}

/// Computes the top-`top_n` gainers and losers over a lookback window.
///
/// The latest date joins against the resolved reference date on product
/// id, restricted to strictly positive prices on both sides. Sorts are
/// stable, so tied products keep their join order. Returns `None` when the
/// period is undefined or the join is empty.
pub fn top_movers(
    table: &HistoricalTable,
    lookback_days: i64,
    top_n: usize,
) -> Option<Movers> {
    let dates = table.distinct_dates();
    let endpoints = periods::resolve_period(&dates, lookback_days)?;
    let reference_prices = table.price_map(endpoints.reference);

    let mut entries = Vec::new();
    for record in table.records_on(endpoints.latest) {
        if record.current_price <= 0.0 {
            continue;
        }
        if let Some(&price_ref) = reference_prices.get(record.product_id.as_str()) {
            if price_ref > 0.0 {
                entries.push(RankingEntry {
                    product_id: record.product_id.clone(),
                    name: record.name.clone(),
                    brand: record.brand.clone(),
                    category: record.category.clone(),
                    price_now: record.current_price,
                    price_ref,
                    pct_change: (record.current_price - price_ref) / price_ref * 100.0,
                });
            }
        }
    }
    if entries.is_empty() {
        return None;
    }

    let mut gainers = entries.clone();
    gainers.sort_by_key(|entry| Reverse(OrderedFloat(entry.pct_change)));
    gainers.truncate(top_n);

    let mut losers = entries;
    losers.sort_by_key(|entry| OrderedFloat(entry.pct_change));
    losers.truncate(top_n);

    Some(Movers { gainers, losers })
}
