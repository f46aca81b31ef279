use chrono::NaiveDate;
use lease_ledger_core::lease::engine::{
    amortize, compute_amortization_schedule, compute_present_value, derive_period_basis,
};
use lease_ledger_core::lease::terms::{Computation, LeaseTerms};
use lease_ledger_core::round_money;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn terms(computation: Computation, lease_term: i32, rate: f64, payment: Decimal) -> LeaseTerms {
    LeaseTerms {
        payment_amount: payment,
        computation,
        lease_term,
        discount_rate: rate,
        start_date: d(2024, 1, 1),
        changing_date: None,
        changing_amount: Decimal::ZERO,
        down_payment: Decimal::ZERO,
    }
}

/// Discount `payment` over `n` periods at `r` with an explicit power per period.
fn direct_pv(payment: Decimal, r: Decimal, n: u32, down_payment: Decimal) -> Decimal {
    let mut total = Decimal::ZERO;
    for t in 1..=n {
        let mut factor = Decimal::ONE;
        for _ in 0..t {
            factor *= Decimal::ONE + r;
        }
        total += payment / factor;
    }
    round_money(total + down_payment)
}

// ===========================================================================
// Present value
// ===========================================================================

#[test]
fn test_reference_yearly_lease() {
    // 5000 + 10000/1.1 + 10000/1.1^2 + 10000/1.1^3 = 29868.52
    let mut lease = terms(Computation::Year, 3, 10.0, dec!(10000));
    lease.down_payment = dec!(5000);
    assert_eq!(compute_present_value(&lease).unwrap(), dec!(29868.52));
}

#[test]
fn test_yearly_pv_formula() {
    let mut lease = terms(Computation::Year, 7, 8.5, dec!(42000));
    lease.down_payment = dec!(12500);
    let expected = direct_pv(dec!(42000), dec!(0.085), 7, dec!(12500));
    assert_eq!(compute_present_value(&lease).unwrap(), expected);
}

#[test]
fn test_monthly_pv_formula() {
    let mut lease = terms(Computation::Month, 3, 7.2, dec!(1800));
    lease.down_payment = dec!(2000);
    // Monthly rate is a simple division: 0.072 / 12 = 0.006
    let expected = direct_pv(dec!(1800), dec!(0.006), 36, dec!(2000));
    let actual = compute_present_value(&lease).unwrap();
    assert!(
        (actual - expected).abs() <= dec!(0.01),
        "Expected {expected}, got {actual}"
    );
}

#[test]
fn test_zero_term_pv_is_down_payment() {
    let mut lease = terms(Computation::Month, 0, 9.0, dec!(500));
    lease.down_payment = dec!(750.25);
    assert_eq!(compute_present_value(&lease).unwrap(), dec!(750.25));
    assert!(compute_amortization_schedule(&lease, dec!(750.25))
        .unwrap()
        .is_empty());
}

#[test]
fn test_pv_recomputation_is_stable() {
    let mut lease = terms(Computation::Month, 4, 5.75, dec!(3210.55));
    lease.changing_date = Some(d(2026, 3, 17));
    lease.changing_amount = dec!(3500);
    let first = compute_present_value(&lease).unwrap();
    let second = compute_present_value(&lease).unwrap();
    assert_eq!(first, second);
}

// ===========================================================================
// Change point
// ===========================================================================

#[test]
fn test_yearly_change_point_from_period_three() {
    let mut lease = terms(Computation::Year, 6, 10.0, dec!(10000));
    lease.changing_date = Some(d(2026, 1, 1));
    lease.changing_amount = dec!(15000);

    let basis = derive_period_basis(&lease).unwrap();
    assert_eq!(basis.change_at_period, Some(2));

    let pv = compute_present_value(&lease).unwrap();
    let schedule = compute_amortization_schedule(&lease, pv).unwrap();
    assert_eq!(schedule[0].payment, dec!(10000));
    assert_eq!(schedule[1].payment, dec!(10000));
    assert!(schedule[2..].iter().all(|row| row.payment == dec!(15000)));
}

#[test]
fn test_monthly_change_point_counts_whole_months() {
    let mut lease = terms(Computation::Month, 1, 12.0, dec!(100));
    // 4 months and 30 days: only 4 whole months have elapsed.
    lease.changing_date = Some(d(2024, 5, 31));
    lease.changing_amount = dec!(200);
    let basis = derive_period_basis(&lease).unwrap();
    assert_eq!(basis.change_at_period, Some(4));

    let schedule = compute_amortization_schedule(&lease, dec!(1000)).unwrap();
    assert_eq!(schedule[3].payment, dec!(100));
    assert_eq!(schedule[4].payment, dec!(200));
}

// ===========================================================================
// Schedule
// ===========================================================================

#[test]
fn test_schedule_chaining_on_displayed_values() {
    let lease = terms(Computation::Month, 2, 6.0, dec!(2500));
    let pv = compute_present_value(&lease).unwrap();
    let schedule = compute_amortization_schedule(&lease, pv).unwrap();

    assert_eq!(schedule.len(), 24);
    assert_eq!(schedule[0].opening_balance, pv);
    for pair in schedule.windows(2) {
        // Balances stay positive until the last period, so no floor applies.
        assert_eq!(pair[1].opening_balance, pair[0].closing_balance);
        assert_eq!(pair[0].payment, pair[0].interest + pair[0].principal);
    }
}

#[test]
fn test_schedule_yearly_dates() {
    let lease = terms(Computation::Year, 4, 5.0, dec!(1000));
    let schedule = compute_amortization_schedule(&lease, dec!(3545.95)).unwrap();
    let dates: Vec<NaiveDate> = schedule.iter().map(|r| r.date).collect();
    assert_eq!(
        dates,
        vec![d(2025, 1, 1), d(2026, 1, 1), d(2027, 1, 1), d(2028, 1, 1)]
    );
}

#[test]
fn test_schedule_leap_day_start() {
    let mut lease = terms(Computation::Year, 2, 5.0, dec!(1000));
    lease.start_date = d(2024, 2, 29);
    let schedule = compute_amortization_schedule(&lease, dec!(1859.41)).unwrap();
    assert_eq!(schedule[0].date, d(2025, 2, 28));
    assert_eq!(schedule[1].date, d(2026, 2, 28));
}

#[test]
fn test_schedule_serializes_iso_dates_and_string_decimals() {
    let lease = terms(Computation::Year, 1, 10.0, dec!(1100));
    let schedule = compute_amortization_schedule(&lease, dec!(1000)).unwrap();
    let value = serde_json::to_value(&schedule).unwrap();
    assert_eq!(value[0]["period"], 1);
    assert_eq!(value[0]["date"], "2025-01-01");
    assert_eq!(value[0]["interest"], "100.00");
    assert_eq!(value[0]["closing_balance"], "0.00");
}

#[test]
fn test_fallback_units_match_monthly_schedule() {
    let monthly = terms(Computation::Month, 1, 4.0, dec!(900));
    let pv = compute_present_value(&monthly).unwrap();
    let expected = compute_amortization_schedule(&monthly, pv).unwrap();

    for unit in [Computation::Quarterly, Computation::HalfOfYear] {
        let mut lease = monthly.clone();
        lease.computation = unit;
        assert_eq!(compute_present_value(&lease).unwrap(), pv);
        assert_eq!(compute_amortization_schedule(&lease, pv).unwrap(), expected);
    }
}

#[test]
fn test_amortize_from_json_terms() {
    let lease: LeaseTerms = serde_json::from_str(
        r#"{
            "payment_amount": "10000",
            "computation": "year",
            "lease_term": 3,
            "discount_rate": 10,
            "start_date": "2024-01-01",
            "down_payment": "5000"
        }"#,
    )
    .unwrap();
    let output = amortize(&lease).unwrap();
    assert_eq!(output.result.present_value, dec!(29868.52));
    assert_eq!(output.result.amortization_schedule.len(), 3);
    assert_eq!(output.result.total_payments, dec!(30000));
}
