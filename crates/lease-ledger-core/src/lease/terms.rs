//! Financial terms consumed by the amortization engine.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LeaseError;
use crate::types::{Money, Rate};
use crate::LeaseResult;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Unit in which `lease_term` and the payment cadence are recorded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PeriodUnit {
    Year,
    Month,
}

/// Period granularity used to build the schedule.
///
/// Only `Year` changes the arithmetic. `Quarterly` and `HalfOfYear` are
/// accepted but derive periods exactly like `Month`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum Computation {
    Month,
    Year,
    Quarterly,
    HalfOfYear,
}

impl Computation {
    pub fn is_yearly(self) -> bool {
        matches!(self, Computation::Year)
    }

    /// True for units that have no arithmetic of their own yet.
    pub fn falls_back_to_monthly(self) -> bool {
        matches!(self, Computation::Quarterly | Computation::HalfOfYear)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Computation::Month => "Month",
            Computation::Year => "Year",
            // Stored spelling of existing records.
            Computation::Quarterly => "Quaterly",
            Computation::HalfOfYear => "Half of Year",
        }
    }
}

impl fmt::Display for Computation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Computation {
    type Err = LeaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(Computation::Month),
            "year" => Ok(Computation::Year),
            "quaterly" | "quarterly" => Ok(Computation::Quarterly),
            "half of year" | "half-of-year" | "halfofyear" => Ok(Computation::HalfOfYear),
            other => Err(LeaseError::InvalidInput {
                field: "computation".into(),
                reason: format!(
                    "unknown computation unit '{other}' (expected Month, Year, Quaterly or Half of Year)"
                ),
            }),
        }
    }
}

impl TryFrom<String> for Computation {
    type Error = LeaseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Computation> for String {
    fn from(value: Computation) -> Self {
        value.as_str().to_string()
    }
}

// ---------------------------------------------------------------------------
// Terms
// ---------------------------------------------------------------------------

/// The subset of a lease financial record that drives the computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseTerms {
    /// Recurring payment before any change
    pub payment_amount: Money,
    /// Period granularity for the schedule
    pub computation: Computation,
    /// Number of terms (years when yearly, else years of 12 monthly periods)
    pub lease_term: i32,
    /// Annual discount rate as a percentage (8.5 = 8.5%)
    pub discount_rate: f64,
    /// First day of the lease; the first period ends one unit later
    pub start_date: NaiveDate,
    /// Date from which `changing_amount` replaces `payment_amount`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changing_date: Option<NaiveDate>,
    #[serde(default)]
    pub changing_amount: Money,
    /// Added once to present value, undiscounted
    #[serde(default)]
    pub down_payment: Money,
}

impl LeaseTerms {
    /// Annual discount rate as a fraction (8.5 -> 0.085).
    pub fn annual_rate(&self) -> LeaseResult<Rate> {
        percent_to_rate(self.discount_rate)
    }
}

/// Normalize a floating-point percentage to a decimal fraction.
///
/// The float is read through its shortest round-trip representation, so
/// `8.1_f64` becomes exactly `0.081` rather than its binary expansion.
pub fn percent_to_rate(percent: f64) -> LeaseResult<Rate> {
    if !percent.is_finite() {
        return Err(LeaseError::InvalidInput {
            field: "discount_rate".into(),
            reason: format!("Discount rate must be a finite number, got {percent}"),
        });
    }
    let as_decimal = Decimal::from_str(&percent.to_string()).map_err(|e| {
        LeaseError::InvalidInput {
            field: "discount_rate".into(),
            reason: format!("Discount rate {percent} is not representable: {e}"),
        }
    })?;
    Ok(as_decimal / dec!(100))
}
