//! Clinic-day selection.
//!
//! The scheduler itself never does calendar arithmetic; the surface picks the
//! next occurrence of the configured clinic weekday and passes that date in.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use triage_core::{TriageError, TriageResult};

/// Default clinic day. The neurosurgery OPD runs on Thursdays.
pub const DEFAULT_CLINIC_DAY: Weekday = Weekday::Thu;

/// Next occurrence of `clinic_day` on or after `today`.
///
/// If `today` already falls on the clinic day, it is returned unchanged.
pub fn next_clinic_date(today: NaiveDate, clinic_day: Weekday) -> NaiveDate {
    let days_ahead = (clinic_day.num_days_from_monday() + 7
        - today.weekday().num_days_from_monday())
        % 7;
    today + Duration::days(i64::from(days_ahead))
}

/// Parse a clinic weekday taken from the environment ("thu", "Thursday", ...).
///
/// `None` yields [`DEFAULT_CLINIC_DAY`].
pub fn clinic_weekday_from_env_value(value: Option<String>) -> TriageResult<Weekday> {
    match value {
        None => Ok(DEFAULT_CLINIC_DAY),
        Some(raw) => raw.trim().parse().map_err(|_| {
            TriageError::InvalidConfig(format!("unrecognised clinic weekday: {raw:?}"))
        }),
    }
}
