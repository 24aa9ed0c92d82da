use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One product's observed price on one calendar date.
///
/// Field names map onto the upstream column names via serde renames, so
/// records round-trip through the historical store and the published
/// artifacts without a translation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Stable product identity (the upstream SKU).
    #[serde(rename = "sku_id")]
    pub product_id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "marca")]
    pub brand: String,
    /// Leaf-level category, free text.
    #[serde(rename = "categoria")]
    pub category: String,
    /// Coarse first-level classification; `"Otros"` when unknown.
    #[serde(rename = "cat_principal")]
    pub top_category: String,
    /// Observed selling price. Always strictly positive after
    /// normalization.
    #[serde(rename = "precio_actual")]
    pub current_price: f64,
    /// Reference ("regular") price. Clamped to `current_price` during
    /// normalization when the upstream value is implausible.
    #[serde(rename = "precio_regular")]
    pub list_price: f64,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
}
