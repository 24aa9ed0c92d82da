//! Snapshot normalization: one day's raw crawler rows into the canonical
//! per-day schema.

use crate::categories;
use crate::record::PriceRecord;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;

/// Largest believable ratio between list price and current price. Upstream
/// occasionally ships a corrupted "regular price" field; anything above
/// this ratio is clamped to the current price.
const MAX_LIST_PRICE_RATIO: f64 = 10.0;

/// One unvalidated row as produced by the crawler.
///
/// Prices arrive as free text and are coerced during normalization; every
/// descriptive field is optional and defaults to empty. Crawler columns the
/// engine does not use (`ean`, `slug`, `disponible`, `link`, ...) are
/// ignored by the CSV reader.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPriceRow {
    #[serde(rename = "sku_id")]
    pub product_id: String,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "marca", default)]
    pub brand: String,
    #[serde(rename = "categoria", default)]
    pub category: String,
    #[serde(rename = "cat_principal", default)]
    pub top_category: String,
    #[serde(rename = "precio_actual", default)]
    pub current_price: String,
    #[serde(rename = "precio_regular", default)]
    pub list_price: String,
}

/// A single day's cleaned snapshot: price-filtered, deduplicated, with the
/// top category defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSnapshot {
    pub date: NaiveDate,
    pub records: Vec<PriceRecord>,
}

impl NormalizedSnapshot {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Coerces a raw price field to a number. Returns `None` when the field
/// does not parse as a finite number.
fn coerce_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|price| price.is_finite())
}

/// Cleans one day's raw rows into a [`NormalizedSnapshot`]. Pure transform,
/// no I/O.
///
/// Rules, applied in order:
/// - rows whose `precio_actual` fails coercion or is not strictly positive
///   are dropped (expected upstream noise, not a reportable error);
/// - `precio_regular` failing coercion becomes 0.0, and values above
///   [`MAX_LIST_PRICE_RATIO`] times the current price are clamped to the
///   current price;
/// - a blank top category becomes [`categories::OTHER_CATEGORY`];
/// - every surviving row is stamped with `date`;
/// - duplicates of the same product are removed, keeping the **last**
///   occurrence (rows later in input order win, matching the crawler's
///   "most recently parsed wins" behavior for products listed under more
///   than one category page).
pub fn normalize_rows(rows: Vec<RawPriceRow>, date: NaiveDate) -> NormalizedSnapshot {
    let mut kept = Vec::with_capacity(rows.len());
    let mut dropped = 0usize;

    for row in rows {
        let current_price = match coerce_price(&row.current_price) {
            Some(price) if price > 0.0 => price,
            _ => {
                dropped += 1;
                continue;
            }
        };

        let mut list_price = coerce_price(&row.list_price)
            .filter(|price| *price >= 0.0)
            .unwrap_or(0.0);
        if list_price > current_price * MAX_LIST_PRICE_RATIO {
            list_price = current_price;
        }

        kept.push(PriceRecord {
            product_id: row.product_id,
            name: row.name,
            brand: row.brand,
            category: row.category,
            top_category: categories::normalize_label(&row.top_category),
            current_price,
            list_price,
            date,
        });
    }

    if dropped > 0 {
        tracing::debug!("excluded {} rows with unusable prices", dropped);
    }

    NormalizedSnapshot {
        date,
        records: dedupe_keep_last(kept),
    }
}

/// Deduplicates by product, keeping each product's last occurrence. The
/// surviving rows keep the order of those last occurrences.
fn dedupe_keep_last(records: Vec<PriceRecord>) -> Vec<PriceRecord> {
    let mut seen = HashSet::new();
    let mut deduped: Vec<PriceRecord> = records
        .into_iter()
        .rev()
        .filter(|record| seen.insert(record.product_id.clone()))
        .collect();
    deduped.reverse();
    deduped
}
