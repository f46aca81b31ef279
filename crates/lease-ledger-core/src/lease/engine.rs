//! Present value and amortization of a lease's payment stream.
//!
//! Both operations share one period basis (period count, per-period rate
//! and change point) derived from the lease terms. Discounting is simple
//! per-period: the annual rate is divided by 12 for monthly schedules, not
//! converted through a compounded root.
//!
//! The schedule starts from a present value supplied by the caller. Use
//! [`amortize`] to compute a fresh present value and its schedule together.

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::calendar::{shift_months, whole_months_between, whole_years_between};
use crate::lease::terms::LeaseTerms;
use crate::time_value::pv_of_payment_stream;
use crate::types::{round_money, with_metadata, ComputationOutput, Money, Rate};
use crate::{LeaseError, LeaseResult};

const MONTHS_PER_YEAR: u32 = 12;
const RESIDUAL_TOLERANCE: Decimal = dec!(0.01);
const MAX_PREALLOCATED_PERIODS: u64 = 1200;

// ---------------------------------------------------------------------------
// Period basis
// ---------------------------------------------------------------------------

/// Derived quantities shared by present value and schedule generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBasis {
    pub is_yearly: bool,
    /// Number of schedule periods (zero for a non-positive term)
    pub total_periods: u64,
    /// Discount rate applied once per period
    pub periodic_rate: Rate,
    /// Periods strictly after this index pay `changing_amount`.
    ///
    /// A changing date less than one full unit after the start gives `0`,
    /// so the changed amount applies from period 1. Ledgers that treated a
    /// zero gap as "no change" keep `payment_amount` for every period there.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_at_period: Option<i64>,
}

impl PeriodBasis {
    /// Payment due in period `t` (1-indexed).
    pub fn payment_for(&self, t: u64, terms: &LeaseTerms) -> Money {
        match self.change_at_period {
            Some(change_at) if t as i64 > change_at => terms.changing_amount,
            _ => terms.payment_amount,
        }
    }

    fn months_per_period(&self) -> i64 {
        if self.is_yearly {
            i64::from(MONTHS_PER_YEAR)
        } else {
            1
        }
    }
}

/// Derive period count, per-period rate and change point from the terms.
pub fn derive_period_basis(terms: &LeaseTerms) -> LeaseResult<PeriodBasis> {
    let annual_rate = terms.annual_rate()?;
    let is_yearly = terms.computation.is_yearly();

    let term = i64::from(terms.lease_term).max(0) as u64;
    let (total_periods, periodic_rate) = if is_yearly {
        (term, annual_rate)
    } else {
        (
            term * u64::from(MONTHS_PER_YEAR),
            annual_rate / Decimal::from(MONTHS_PER_YEAR),
        )
    };

    let change_at_period = match terms.changing_date {
        Some(changing_date) if is_yearly => {
            Some(whole_years_between(terms.start_date, changing_date)?)
        }
        Some(changing_date) => Some(whole_months_between(terms.start_date, changing_date)?),
        None => None,
    };

    Ok(PeriodBasis {
        is_yearly,
        total_periods,
        periodic_rate,
        change_at_period,
    })
}

// ---------------------------------------------------------------------------
// Present value
// ---------------------------------------------------------------------------

/// Present value of the lease payments plus the undiscounted down payment,
/// rounded half-to-even to 2 decimal places.
///
/// A zero term yields exactly the down payment.
pub fn compute_present_value(terms: &LeaseTerms) -> LeaseResult<Money> {
    let basis = derive_period_basis(terms)?;
    let payments = (1..=basis.total_periods).map(|t| basis.payment_for(t, terms));
    let discounted = pv_of_payment_stream(payments, basis.periodic_rate)?;
    let present_value = round_money(
        discounted
            .checked_add(terms.down_payment)
            .ok_or_else(|| overflow("present value"))?,
    );

    debug!(
        "present value {} over {} periods at {} per period",
        present_value, basis.total_periods, basis.periodic_rate
    );
    Ok(present_value)
}

// ---------------------------------------------------------------------------
// Amortization schedule
// ---------------------------------------------------------------------------

/// One row of the amortization schedule, rounded to currency precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodEntry {
    pub period: u64,
    /// End date of the period
    pub date: NaiveDate,
    pub opening_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    /// Floored at zero; the running balance itself is not
    pub closing_balance: Money,
}

/// Unrounded state of one period, as carried through the fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PeriodSnapshot {
    pub period: u64,
    pub date: NaiveDate,
    pub opening_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

impl From<&PeriodSnapshot> for PeriodEntry {
    fn from(s: &PeriodSnapshot) -> Self {
        PeriodEntry {
            period: s.period,
            date: s.date,
            opening_balance: round_money(s.opening_balance),
            payment: round_money(s.payment),
            interest: round_money(s.interest),
            principal: round_money(s.principal),
            closing_balance: round_money(s.closing_balance.max(Decimal::ZERO)),
        }
    }
}

/// Period-by-period schedule starting from `present_value`.
///
/// `present_value` must be current for `terms`; pass the output of
/// [`compute_present_value`] or a stored value kept in sync with it.
pub fn compute_amortization_schedule(
    terms: &LeaseTerms,
    present_value: Money,
) -> LeaseResult<Vec<PeriodEntry>> {
    let basis = derive_period_basis(terms)?;
    let snapshots = schedule_snapshots(terms, &basis, present_value)?;
    Ok(snapshots.iter().map(PeriodEntry::from).collect())
}

/// Left fold over the periods carrying `(balance, date)`.
///
/// A running balance that grows past the decimal range is an error.
pub(crate) fn schedule_snapshots(
    terms: &LeaseTerms,
    basis: &PeriodBasis,
    present_value: Money,
) -> LeaseResult<Vec<PeriodSnapshot>> {
    let step = basis.months_per_period();
    let capacity =
        usize::try_from(basis.total_periods.min(MAX_PREALLOCATED_PERIODS)).unwrap_or(0);

    let (_, _, snapshots) = (1..=basis.total_periods).try_fold(
        (present_value, terms.start_date, Vec::with_capacity(capacity)),
        |(balance, date, mut rows), t| -> LeaseResult<_> {
            let at_period = || overflow(&format!("amortization schedule period {t}"));
            let interest = balance
                .checked_mul(basis.periodic_rate)
                .ok_or_else(at_period)?;
            let payment = basis.payment_for(t, terms);
            let principal = payment.checked_sub(interest).ok_or_else(at_period)?;
            let closing_balance = balance.checked_sub(principal).ok_or_else(at_period)?;
            let period_end = shift_months(date, step)?;

            rows.push(PeriodSnapshot {
                period: t,
                date: period_end,
                opening_balance: balance,
                payment,
                interest,
                principal,
                closing_balance,
            });
            Ok((closing_balance, period_end, rows))
        },
    )?;

    Ok(snapshots)
}

fn overflow(context: &str) -> LeaseError {
    LeaseError::Overflow {
        context: context.to_string(),
    }
}

fn checked_total<I: IntoIterator<Item = Money>>(values: I, context: &str) -> LeaseResult<Money> {
    values.into_iter().try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v).ok_or_else(|| overflow(context))
    })
}

// ---------------------------------------------------------------------------
// Combined computation
// ---------------------------------------------------------------------------

/// Present value, schedule and summary totals for one lease.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub present_value: Money,
    pub basis: PeriodBasis,
    /// Undiscounted sum of scheduled payments
    pub total_payments: Money,
    pub total_interest: Money,
    /// Running balance after the last period, before flooring
    pub final_balance: Money,
    pub amortization_schedule: Vec<PeriodEntry>,
}

/// Compute a fresh present value and the schedule that starts from it.
pub fn amortize(terms: &LeaseTerms) -> LeaseResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let basis = derive_period_basis(terms)?;
    let present_value = compute_present_value(terms)?;
    let snapshots = schedule_snapshots(terms, &basis, present_value)?;

    if terms.computation.falls_back_to_monthly() {
        warnings.push(format!(
            "Computation unit '{}' has no distinct period arithmetic; periods derived monthly",
            terms.computation
        ));
    }
    if let Some(change_at) = basis.change_at_period {
        if change_at <= 0 {
            warnings.push(format!(
                "Changing date is not a full {} after the start date; changing amount applies from period 1",
                if basis.is_yearly { "year" } else { "month" }
            ));
        } else if change_at as u64 >= basis.total_periods {
            warnings.push(format!(
                "Changing date falls after period {}; changing amount never applies",
                basis.total_periods
            ));
        }
    }

    let total_payments = checked_total(snapshots.iter().map(|s| s.payment), "total payments")?;
    let total_interest = checked_total(snapshots.iter().map(|s| s.interest), "total interest")?;
    let final_balance = snapshots
        .last()
        .map(|s| s.closing_balance)
        .unwrap_or(present_value);

    if !snapshots.is_empty() && final_balance.abs() > RESIDUAL_TOLERANCE {
        warnings.push(format!(
            "Running balance of {} remains after period {}; closing balances are floored at zero",
            round_money(final_balance),
            basis.total_periods
        ));
    }

    let output = AmortizationOutput {
        present_value,
        basis,
        total_payments: round_money(total_payments),
        total_interest: round_money(total_interest),
        final_balance: round_money(final_balance),
        amortization_schedule: snapshots.iter().map(PeriodEntry::from).collect(),
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Simple per-period discounting with effective-interest amortization",
        terms,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
