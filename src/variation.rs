//! Period-relative variation: the mean percentage price change between two
//! resolved dates.

use crate::history::HistoricalTable;
use crate::periods;
use chrono::NaiveDate;

/// Rounds to two decimals, the precision every published percentage uses.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Mean percentage change between two dates' prices, joined on product id.
///
/// Only products present on both dates with strictly positive prices on
/// both sides participate. Returns `None` when the join is empty. The
/// table side of the join is iterated in row order, keeping the aggregate
/// reproducible.
pub(crate) fn mean_pct_change(
    table: &HistoricalTable,
    now: NaiveDate,
    reference: NaiveDate,
) -> Option<f64> {
    let reference_prices = table.price_map(reference);

    let mut sum = 0.0;
    let mut matched = 0usize;
    for record in table.records_on(now) {
        if record.current_price <= 0.0 {
            continue;
        }
        if let Some(&price_ref) = reference_prices.get(record.product_id.as_str()) {
            if price_ref > 0.0 {
                sum += (record.current_price - price_ref) / price_ref * 100.0;
                matched += 1;
            }
        }
    }

    if matched == 0 {
        None
    } else {
        Some(sum / matched as f64)
    }
}

/// Mean percentage price change between the latest date in `table` and the
/// reference date resolved for `lookback_days`, rounded to two decimals.
///
/// Works identically on a category slice; the period then resolves within
/// the slice's own dates. Returns `None` when the period is undefined or
/// no product is present on both endpoints.
pub fn period_variation(table: &HistoricalTable, lookback_days: i64) -> Option<f64> {
    let dates = table.distinct_dates();
    let endpoints = periods::resolve_period(&dates, lookback_days)?;
    mean_pct_change(table, endpoints.latest, endpoints.reference).map(round2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::NormalizedSnapshot;
    use crate::record::PriceRecord;

    fn record(product_id: &str, date: NaiveDate, price: f64) -> PriceRecord {
        PriceRecord {
            product_id: product_id.to_string(),
            name: format!("Producto {}", product_id),
            brand: "Marca".to_string(),
            category: "Gaseosas".to_string(),
            top_category: "Bebidas".to_string(),
            current_price: price,
            list_price: price,
            date,
        }
    }

    fn table_with_days(days: Vec<(NaiveDate, Vec<(&str, f64)>)>) -> HistoricalTable {
        let mut table = HistoricalTable::new();
        for (date, prices) in days {
            table.merge_day(NormalizedSnapshot {
                date,
                records: prices
                    .into_iter()
                    .map(|(id, price)| record(id, date, price))
                    .collect(),
            });
        }
        table
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn ten_percent_rise_yields_ten() {
        let table = table_with_days(vec![
            (date(2024, 1, 1), vec![("A", 100.0)]),
            (date(2024, 1, 2), vec![("A", 110.0)]),
        ]);

        assert_eq!(period_variation(&table, periods::DAY), Some(10.0));
    }

    #[test]
    fn uniform_rise_matches_the_common_percentage() {
        // Every product up exactly 5%.
        let table = table_with_days(vec![
            (date(2024, 1, 1), vec![("A", 100.0), ("B", 200.0), ("C", 40.0)]),
            (date(2024, 1, 2), vec![("A", 105.0), ("B", 210.0), ("C", 42.0)]),
        ]);

        assert_eq!(period_variation(&table, periods::DAY), Some(5.0));
    }

    #[test]
    fn mixed_moves_average_out() {
        let table = table_with_days(vec![
            (date(2024, 1, 1), vec![("A", 100.0), ("B", 100.0)]),
            (date(2024, 1, 2), vec![("A", 110.0), ("B", 90.0)]),
        ]);

        assert_eq!(period_variation(&table, periods::DAY), Some(0.0));
    }

    #[test]
    fn single_date_history_is_undefined() {
        let table = table_with_days(vec![(date(2024, 1, 1), vec![("A", 100.0)])]);
        assert_eq!(period_variation(&table, periods::DAY), None);
        assert_eq!(period_variation(&table, periods::MONTH), None);
        assert_eq!(period_variation(&table, periods::YEAR), None);
    }

    #[test]
    fn disjoint_product_sets_are_undefined() {
        let table = table_with_days(vec![
            (date(2024, 1, 1), vec![("A", 100.0)]),
            (date(2024, 1, 2), vec![("B", 50.0)]),
        ]);

        assert_eq!(period_variation(&table, periods::DAY), None);
    }

    #[test]
    fn only_the_intersection_participates() {
        // B is new on day 2, C disappeared; only A is compared.
        let table = table_with_days(vec![
            (date(2024, 1, 1), vec![("A", 100.0), ("C", 80.0)]),
            (date(2024, 1, 2), vec![("A", 120.0), ("B", 999.0)]),
        ]);

        assert_eq!(period_variation(&table, periods::DAY), Some(20.0));
    }

    #[test]
    fn result_is_rounded_to_two_decimals() {
        let table = table_with_days(vec![
            (date(2024, 1, 1), vec![("A", 3.0)]),
            (date(2024, 1, 2), vec![("A", 4.0)]),
        ]);

        // (4 - 3) / 3 * 100 = 33.333...
        assert_eq!(period_variation(&table, periods::DAY), Some(33.33));
    }

    #[test]
    fn category_slice_resolves_within_its_own_dates() {
        let mut table = table_with_days(vec![
            (date(2024, 1, 1), vec![("A", 100.0)]),
            (date(2024, 1, 2), vec![("A", 110.0)]),
        ]);
        // A second category observed on day 2 only.
        let mut other = record("X", date(2024, 1, 2), 50.0);
        other.top_category = "Limpieza".to_string();
        table.merge_day(NormalizedSnapshot {
            date: date(2024, 1, 2),
            records: vec![record("A", date(2024, 1, 2), 110.0), other],
        });

        let bebidas = table.category_slice("Bebidas");
        assert_eq!(period_variation(&bebidas, periods::DAY), Some(10.0));

        // Limpieza has a single date in its slice, so its period is
        // undefined even though the whole table has two.
        let limpieza = table.category_slice("Limpieza");
        assert_eq!(period_variation(&limpieza, periods::DAY), None);
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(1.234567), 1.23);
        assert_eq!(round2(1.236), 1.24);
        assert_eq!(round2(-3.336), -3.34);
        assert_eq!(round2(0.0), 0.0);
    }
}
