use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::LeaseError;
use crate::types::{Money, Rate};
use crate::LeaseResult;

/// Present value of a payment stream where the `i`-th payment (from zero)
/// falls at the end of period `i + 1`, discounted at a constant per-period
/// rate.
///
/// Discount factors are built by repeated multiplication so each period's
/// factor is exactly `(1 + rate)^t` at decimal precision. Once the factor
/// leaves the decimal range the remaining terms are below its resolution
/// and accumulation stops.
pub fn pv_of_payment_stream<I>(payments: I, rate: Rate) -> LeaseResult<Money>
where
    I: IntoIterator<Item = Money>,
{
    let mut pv = Decimal::ZERO;
    let mut discount_factor = Decimal::ONE;
    let one_plus_r = Decimal::ONE + rate;
    for payment in payments {
        discount_factor = match discount_factor.checked_mul(one_plus_r) {
            Some(factor) => factor,
            None => break,
        };
        if discount_factor.is_zero() {
            continue;
        }
        pv = payment
            .checked_div(discount_factor)
            .and_then(|discounted| pv.checked_add(discounted))
            .ok_or_else(|| LeaseError::Overflow {
                context: "present value accumulation".into(),
            })?;
    }
    Ok(pv)
}

/// Closed-form present value of a level payment at the end of each period.
///
/// PV = pmt * (1 - (1 + r)^-n) / r, or pmt * n when r is zero.
pub fn level_annuity_pv(rate: Rate, nper: u32, pmt: Money) -> Money {
    if rate.is_zero() {
        return pmt * Decimal::from(nper);
    }
    match (Decimal::ONE + rate).checked_powu(u64::from(nper)) {
        Some(factor) if factor.is_zero() => Decimal::ZERO,
        Some(factor) => pmt * (Decimal::ONE - Decimal::ONE / factor) / rate,
        // (1 + r)^-n vanishes
        None => pmt / rate,
    }
}
