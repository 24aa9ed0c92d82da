//! Reference-date resolution for lookback windows.

use chrono::{Duration, NaiveDate};

/// Lookback windows, in calendar days.
pub const DAY: i64 = 1;
pub const WEEK: i64 = 7;
pub const MONTH: i64 = 30;
pub const HALF_YEAR: i64 = 180;
pub const YEAR: i64 = 365;

/// The two dates an analytic compares: the most recent date in history and
/// the reference resolved for a lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodEndpoints {
    pub latest: NaiveDate,
    pub reference: NaiveDate,
}

/// Resolves the reference date for a lookback window.
///
/// `dates` are the distinct dates present in history, sorted ascending.
/// The cutoff is `latest - lookback_days`; the reference is the latest
/// available date on or before the cutoff. Calendar gaps (missed runs,
/// products with no observation on some day) make fixed-offset indexing
/// unsafe, so this is the only resolution policy used anywhere.
///
/// Returns `None` when history is too short for the window. Callers treat
/// an undefined period as "not yet computable", never as an error.
pub fn resolve_period(dates: &[NaiveDate], lookback_days: i64) -> Option<PeriodEndpoints> {
    if dates.len() < 2 {
        return None;
    }

    let latest = *dates.last()?;
    let cutoff = latest - Duration::days(lookback_days);
    let reference = dates.iter().rev().find(|date| **date <= cutoff).copied()?;

    Some(PeriodEndpoints { latest, reference })
}
