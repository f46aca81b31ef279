use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use lease_ledger_core::lease::engine;
use lease_ledger_core::lease::terms::{Computation, LeaseTerms};

use crate::input;

/// Lease terms, from flags or a JSON file
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct TermsArgs {
    /// Recurring payment before any change
    #[arg(long)]
    pub payment_amount: Option<Decimal>,

    /// Period unit: Month, Year, Quaterly or "Half of Year"
    #[arg(long, default_value = "Month")]
    pub computation: Computation,

    /// Number of lease terms (years)
    #[arg(long)]
    pub lease_term: Option<i32>,

    /// Annual discount rate as a percentage (e.g. 8.5 for 8.5%)
    #[arg(long)]
    pub discount_rate: Option<f64>,

    /// Lease start date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Date from which the changing amount applies (YYYY-MM-DD)
    #[arg(long)]
    pub changing_date: Option<NaiveDate>,

    /// Payment amount after the changing date
    #[arg(long)]
    pub changing_amount: Option<Decimal>,

    /// Undiscounted down payment
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

fn resolve_terms(args: TermsArgs) -> Result<LeaseTerms, Box<dyn std::error::Error>> {
    let terms = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        LeaseTerms {
            payment_amount: args
                .payment_amount
                .ok_or("--payment-amount is required (or provide --input)")?,
            computation: args.computation,
            lease_term: args
                .lease_term
                .ok_or("--lease-term is required (or provide --input)")?,
            discount_rate: args
                .discount_rate
                .ok_or("--discount-rate is required (or provide --input)")?,
            start_date: args
                .start_date
                .ok_or("--start-date is required (or provide --input)")?,
            changing_date: args.changing_date,
            changing_amount: args.changing_amount.unwrap_or(dec!(0)),
            down_payment: args.down_payment.unwrap_or(dec!(0)),
        }
    };
    Ok(terms)
}

pub fn run_present_value(args: TermsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = resolve_terms(args)?;
    let present_value = engine::compute_present_value(&terms)?;
    let basis = engine::derive_period_basis(&terms)?;
    Ok(json!({
        "present_value": present_value,
        "total_periods": basis.total_periods,
        "periodic_rate": basis.periodic_rate,
    }))
}

pub fn run_schedule(args: TermsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = resolve_terms(args)?;
    let result = engine::amortize(&terms)?;
    Ok(serde_json::to_value(result)?)
}
