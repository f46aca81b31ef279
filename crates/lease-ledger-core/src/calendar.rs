//! Calendar-aware month arithmetic.
//!
//! Adding months clamps the day to the end of the target month
//! (2024-01-31 + 1 month = 2024-02-29). Whole-month differences count
//! only months that have fully elapsed under that same clamping rule,
//! truncating toward zero for dates that run backwards.

use chrono::{Datelike, Months, NaiveDate};

use crate::error::LeaseError;
use crate::LeaseResult;

/// Shift `date` by a signed number of months, clamping the day.
pub fn shift_months(date: NaiveDate, months: i64) -> LeaseResult<NaiveDate> {
    let magnitude = u32::try_from(months.unsigned_abs()).map_err(|_| {
        LeaseError::DateError(format!("month offset {months} is out of range"))
    })?;
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(magnitude))
    } else {
        date.checked_sub_months(Months::new(magnitude))
    };
    shifted.ok_or_else(|| {
        LeaseError::DateError(format!("{date} shifted by {months} months is out of range"))
    })
}

/// Number of whole months elapsed from `from` to `to`.
///
/// Negative when `to` precedes `from`.
pub fn whole_months_between(from: NaiveDate, to: NaiveDate) -> LeaseResult<i64> {
    let mut months = i64::from(to.year() - from.year()) * 12
        + i64::from(to.month()) - i64::from(from.month());

    if to >= from {
        while shift_months(from, months)? > to {
            months -= 1;
        }
    } else {
        while shift_months(from, months)? < to {
            months += 1;
        }
    }

    Ok(months)
}

/// Number of whole years elapsed from `from` to `to`, floored.
///
/// A gap of -7 months is -1 year, not 0.
pub fn whole_years_between(from: NaiveDate, to: NaiveDate) -> LeaseResult<i64> {
    Ok(whole_months_between(from, to)?.div_euclid(12))
}
