//! Lease contract and lease financial records.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LeaseError;
use crate::lease::terms::{Computation, LeaseTerms, PeriodUnit};
use crate::types::{Money, MONEY_DP};
use crate::LeaseResult;

const EXCHANGE_RATE_DP: u32 = 4;

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ContractStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
    Amendment,
}

/// Writable fields of a lease contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLeaseContract {
    /// Unique contract code
    pub code: String,
    pub lease_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub leasor_name: String,
    pub contract_date: NaiveDate,
    #[serde(default)]
    pub status: ContractStatus,
}

impl NewLeaseContract {
    pub fn validate(&self) -> LeaseResult<()> {
        require_text("code", &self.code)?;
        require_text("lease_type", &self.lease_type)?;
        require_text("leasor_name", &self.leasor_name)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaseContract {
    pub id: u64,
    pub code: String,
    pub lease_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub leasor_name: String,
    pub contract_date: NaiveDate,
    pub status: ContractStatus,
}

impl LeaseContract {
    pub fn from_input(id: u64, input: NewLeaseContract) -> Self {
        LeaseContract {
            id,
            code: input.code,
            lease_type: input.lease_type,
            description: input.description,
            leasor_name: input.leasor_name,
            contract_date: input.contract_date,
            status: input.status,
        }
    }
}

impl fmt::Display for LeaseContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code, self.leasor_name)
    }
}

// ---------------------------------------------------------------------------
// Financials
// ---------------------------------------------------------------------------

/// Writable fields of a lease financial record.
///
/// `present_value` is not part of the input; any value sent by a client is
/// ignored and recomputed on save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseFinancialInput {
    /// Id of the owning contract
    pub lease: u64,
    pub contract_amount: Money,
    pub deposit: Money,
    pub down_payment: Money,
    pub other_cost: Money,
    pub dismantling_cost: Money,
    pub currency: String,
    pub home_currency: String,
    /// Stored for reference; never applied to the computation
    pub exchange_rate: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub lease_term: i32,
    pub lease_period: PeriodUnit,
    /// Annual percentage (8.5 = 8.5%)
    pub discount_rate: f64,
    pub payment_amount: Money,
    pub payment_period: PeriodUnit,
    pub computation: Computation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changing_date: Option<NaiveDate>,
    #[serde(default)]
    pub changing_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl LeaseFinancialInput {
    pub fn terms(&self) -> LeaseTerms {
        LeaseTerms {
            payment_amount: self.payment_amount,
            computation: self.computation,
            lease_term: self.lease_term,
            discount_rate: self.discount_rate,
            start_date: self.start_date,
            changing_date: self.changing_date,
            changing_amount: self.changing_amount,
            down_payment: self.down_payment,
        }
    }

    /// Well-formedness checks run before a record reaches the engine.
    pub fn validate(&self) -> LeaseResult<()> {
        if self.lease_term < 1 {
            return Err(LeaseError::InvalidInput {
                field: "lease_term".into(),
                reason: "Lease term must be at least 1".into(),
            });
        }
        if !self.discount_rate.is_finite() || self.discount_rate < 0.0 {
            return Err(LeaseError::InvalidInput {
                field: "discount_rate".into(),
                reason: "Discount rate must be a finite, non-negative percentage".into(),
            });
        }
        for (field, amount) in [
            ("payment_amount", self.payment_amount),
            ("changing_amount", self.changing_amount),
            ("down_payment", self.down_payment),
            ("contract_amount", self.contract_amount),
            ("deposit", self.deposit),
            ("other_cost", self.other_cost),
            ("dismantling_cost", self.dismantling_cost),
        ] {
            require_non_negative(field, amount)?;
            require_places(field, amount, MONEY_DP)?;
        }
        require_places("exchange_rate", self.exchange_rate, EXCHANGE_RATE_DP)?;
        if self.exchange_rate <= Decimal::ZERO {
            return Err(LeaseError::InvalidInput {
                field: "exchange_rate".into(),
                reason: "Exchange rate must be positive".into(),
            });
        }
        if self.end_date < self.start_date {
            return Err(LeaseError::InvalidInput {
                field: "end_date".into(),
                reason: format!(
                    "End date {} is before start date {}",
                    self.end_date, self.start_date
                ),
            });
        }
        require_text("currency", &self.currency)?;
        require_text("home_currency", &self.home_currency)?;
        Ok(())
    }
}

/// A stored lease financial record with its derived present value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaseFinancialRecord {
    pub id: u64,
    pub lease: u64,
    pub contract_amount: Money,
    pub deposit: Money,
    /// Derived on every save
    pub present_value: Money,
    pub down_payment: Money,
    pub other_cost: Money,
    pub dismantling_cost: Money,
    pub currency: String,
    pub home_currency: String,
    pub exchange_rate: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub lease_term: i32,
    pub lease_period: PeriodUnit,
    pub discount_rate: f64,
    pub payment_amount: Money,
    pub payment_period: PeriodUnit,
    pub computation: Computation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changing_date: Option<NaiveDate>,
    #[serde(default)]
    pub changing_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl LeaseFinancialRecord {
    /// Build a record from validated input and its freshly computed present value.
    pub fn from_input(id: u64, input: LeaseFinancialInput, present_value: Money) -> Self {
        LeaseFinancialRecord {
            id,
            lease: input.lease,
            contract_amount: input.contract_amount,
            deposit: input.deposit,
            present_value,
            down_payment: input.down_payment,
            other_cost: input.other_cost,
            dismantling_cost: input.dismantling_cost,
            currency: input.currency,
            home_currency: input.home_currency,
            exchange_rate: input.exchange_rate,
            start_date: input.start_date,
            end_date: input.end_date,
            lease_term: input.lease_term,
            lease_period: input.lease_period,
            discount_rate: input.discount_rate,
            payment_amount: input.payment_amount,
            payment_period: input.payment_period,
            computation: input.computation,
            changing_date: input.changing_date,
            changing_amount: input.changing_amount,
            reason: input.reason,
        }
    }

    pub fn terms(&self) -> LeaseTerms {
        LeaseTerms {
            payment_amount: self.payment_amount,
            computation: self.computation,
            lease_term: self.lease_term,
            discount_rate: self.discount_rate,
            start_date: self.start_date,
            changing_date: self.changing_date,
            changing_amount: self.changing_amount,
            down_payment: self.down_payment,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn require_text(field: &str, value: &str) -> LeaseResult<()> {
    if value.trim().is_empty() {
        return Err(LeaseError::InvalidInput {
            field: field.into(),
            reason: "Must not be empty".into(),
        });
    }
    Ok(())
}

/// Trailing zeros do not count: `100.50` and `100.5000` both pass at 2.
fn require_places(field: &str, value: Decimal, places: u32) -> LeaseResult<()> {
    if value.normalize().scale() > places {
        return Err(LeaseError::InvalidInput {
            field: field.into(),
            reason: format!("At most {places} decimal places allowed, got {value}"),
        });
    }
    Ok(())
}

fn require_non_negative(field: &str, value: Money) -> LeaseResult<()> {
    if value < Decimal::ZERO {
        return Err(LeaseError::InvalidInput {
            field: field.into(),
            reason: format!("Must not be negative, got {value}"),
        });
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_contract_display() {
        let contract = LeaseContract::from_input(1, warehouse_contract("LC-001"));
        assert_eq!(contract.to_string(), "LC-001 - Harbor Logistics Ltd");
    }

    #[test]
    fn test_contract_status_defaults_to_active() {
        let input: NewLeaseContract = serde_json::from_str(
            r#"{"code":"LC-9","lease_type":"Office","leasor_name":"Acme","contract_date":"2024-02-01"}"#,
        )
        .unwrap();
        assert_eq!(input.status, ContractStatus::Active);
    }

    #[test]
    fn test_contract_requires_code() {
        let mut input = warehouse_contract("  ");
        assert!(input.validate().is_err());
        input.code = "LC-2".into();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_financial_valid_fixture() {
        assert!(equipment_financial(1).validate().is_ok());
    }

    #[test]
    fn test_financial_invalid_zero_lease_term() {
        let mut input = equipment_financial(1);
        input.lease_term = 0;
        let err = input.validate().unwrap_err();
        match err {
            LeaseError::InvalidInput { field, .. } => assert_eq!(field, "lease_term"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_financial_invalid_negative_rate() {
        let mut input = equipment_financial(1);
        input.discount_rate = -1.0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_financial_invalid_negative_payment() {
        let mut input = equipment_financial(1);
        input.payment_amount = dec!(-1);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_financial_invalid_end_before_start() {
        let mut input = equipment_financial(1);
        input.end_date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_financial_rejects_sub_cent_amounts() {
        let mut input = equipment_financial(1);
        input.payment_amount = dec!(100.005);
        match input.validate().unwrap_err() {
            LeaseError::InvalidInput { field, .. } => assert_eq!(field, "payment_amount"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }

        let mut input = equipment_financial(1);
        input.down_payment = dec!(0.001);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_financial_trailing_zeros_do_not_count_as_places() {
        let mut input = equipment_financial(1);
        input.payment_amount = dec!(100.5000);
        input.exchange_rate = dec!(1.23450000);
        assert!(input.validate().is_ok());

        input.exchange_rate = dec!(1.23456);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_financial_invalid_zero_exchange_rate() {
        let mut input = equipment_financial(1);
        input.exchange_rate = Decimal::ZERO;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_input_ignores_client_present_value() {
        let mut value = serde_json::to_value(equipment_financial(3)).unwrap();
        value["present_value"] = serde_json::json!("999999.99");
        let input: LeaseFinancialInput = serde_json::from_value(value).unwrap();
        let record = LeaseFinancialRecord::from_input(7, input, dec!(12.34));
        assert_eq!(record.present_value, dec!(12.34));
        assert_eq!(record.lease, 3);
    }

    #[test]
    fn test_terms_carry_computation_fields() {
        let input = equipment_financial(1);
        let terms = input.terms();
        assert_eq!(terms.payment_amount, dec!(10000));
        assert_eq!(terms.lease_term, 5);
        assert_eq!(terms.down_payment, dec!(5000));
        assert_eq!(terms.computation, Computation::Month);
    }
}
