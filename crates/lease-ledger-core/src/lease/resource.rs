//! Outward-facing shapes of the lease records.

use serde::{Deserialize, Serialize};

use crate::lease::engine::{compute_amortization_schedule, PeriodEntry};
use crate::lease::records::{LeaseContract, LeaseFinancialRecord};
use crate::LeaseResult;

/// A financial record with its schedule, computed on demand from the
/// stored present value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseFinancialResource {
    #[serde(flatten)]
    pub record: LeaseFinancialRecord,
    pub amortization_schedule: Vec<PeriodEntry>,
}

impl LeaseFinancialResource {
    pub fn from_record(record: LeaseFinancialRecord) -> LeaseResult<Self> {
        let amortization_schedule =
            compute_amortization_schedule(&record.terms(), record.present_value)?;
        Ok(Self {
            record,
            amortization_schedule,
        })
    }
}

/// A contract with its financial sub-resource embedded read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseContractResource {
    #[serde(flatten)]
    pub contract: LeaseContract,
    pub financial: Option<LeaseFinancialResource>,
}

impl LeaseContractResource {
    pub fn build(
        contract: LeaseContract,
        financial: Option<LeaseFinancialRecord>,
    ) -> LeaseResult<Self> {
        let financial = financial
            .map(LeaseFinancialResource::from_record)
            .transpose()?;
        Ok(Self {
            contract,
            financial,
        })
    }
}
