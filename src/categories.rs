//! Fixed top-level category enumeration.
//!
//! Membership and display order are configuration, not a type hierarchy:
//! the labels must match the level-1 names the crawler emits, verbatim.

use std::collections::HashSet;

/// Fallback label for rows with a blank or missing top category.
pub const OTHER_CATEGORY: &str = "Otros";

/// Display order for per-category breakdowns.
///
/// `OTHER_CATEGORY` is deliberately absent, so uncategorized rows never
/// surface in category views.
pub const DISPLAY_ORDER: [&str; 16] = [
    "Almacén",
    "Bebidas",
    "Congelados",
    "Lácteos",
    "Quesos y Fiambres",
    "Frutas y Verduras",
    "Carnes",
    "Rotiseria",
    "Panaderia y Pasteleria",
    "Limpieza",
    "Perfumería",
    "Mascotas",
    "Hogar y textil",
    "Mundo Bebe",
    "Electro",
    "Tiempo Libre",
];

/// Maps a raw top-category value to its canonical label.
pub fn normalize_label(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        OTHER_CATEGORY.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Filters the display order down to the categories actually present.
/// Absent categories are omitted, not zero-filled.
pub fn present_in_display_order(present: &HashSet<String>) -> Vec<String> {
    DISPLAY_ORDER
        .iter()
        .filter(|label| present.contains(**label))
        .map(|label| label.to_string())
        .collect()
}
