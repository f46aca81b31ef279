//! Record store for lease contracts and their financials.
//!
//! Saving a financial record always recomputes its present value, so a
//! stored `present_value` is current for the stored terms.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::LeaseError;
use crate::lease::engine::compute_present_value;
use crate::lease::records::{
    LeaseContract, LeaseFinancialInput, LeaseFinancialRecord, NewLeaseContract,
};
use crate::lease::resource::{LeaseContractResource, LeaseFinancialResource};
use crate::LeaseResult;

pub trait LeaseRepository {
    fn create_contract(&mut self, input: NewLeaseContract) -> LeaseResult<LeaseContract>;
    fn update_contract(&mut self, id: u64, input: NewLeaseContract) -> LeaseResult<LeaseContract>;
    fn get_contract(&self, id: u64) -> LeaseResult<LeaseContract>;
    fn list_contracts(&self) -> Vec<LeaseContract>;
    /// Removes the contract and its financial record.
    fn delete_contract(&mut self, id: u64) -> LeaseResult<()>;

    fn create_financial(&mut self, input: LeaseFinancialInput) -> LeaseResult<LeaseFinancialRecord>;
    fn update_financial(
        &mut self,
        id: u64,
        input: LeaseFinancialInput,
    ) -> LeaseResult<LeaseFinancialRecord>;
    fn get_financial(&self, id: u64) -> LeaseResult<LeaseFinancialRecord>;
    fn financial_for_contract(&self, contract_id: u64) -> Option<LeaseFinancialRecord>;
    fn list_financials(&self) -> Vec<LeaseFinancialRecord>;
    fn delete_financial(&mut self, id: u64) -> LeaseResult<()>;

    /// Contract with its embedded financial resource.
    fn contract_resource(&self, id: u64) -> LeaseResult<LeaseContractResource> {
        let contract = self.get_contract(id)?;
        let financial = self.financial_for_contract(id);
        LeaseContractResource::build(contract, financial)
    }

    fn financial_resource(&self, id: u64) -> LeaseResult<LeaseFinancialResource> {
        LeaseFinancialResource::from_record(self.get_financial(id)?)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InMemoryLeaseStore {
    next_contract_id: u64,
    next_financial_id: u64,
    contracts: BTreeMap<u64, LeaseContract>,
    financials: BTreeMap<u64, LeaseFinancialRecord>,
}

impl InMemoryLeaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON snapshot, or start empty if the file does not exist.
    pub fn load(path: &Path) -> LeaseResult<Self> {
        if !path.exists() {
            debug!("no snapshot at {}, starting empty store", path.display());
            return Ok(Self::new());
        }
        let contents = fs::read_to_string(path)
            .map_err(|e| LeaseError::Io(format!("Failed to read '{}': {}", path.display(), e)))?;
        let store: Self = serde_json::from_str(&contents)?;
        info!(
            "loaded {} contracts and {} financials from {}",
            store.contracts.len(),
            store.financials.len(),
            path.display()
        );
        Ok(store)
    }

    /// Write the store as a JSON snapshot.
    pub fn save(&self, path: &Path) -> LeaseResult<()> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
            .map_err(|e| LeaseError::Io(format!("Failed to write '{}': {}", path.display(), e)))?;
        debug!("saved snapshot to {}", path.display());
        Ok(())
    }

    fn ensure_unique_code(&self, code: &str, except: Option<u64>) -> LeaseResult<()> {
        let taken = self
            .contracts
            .values()
            .any(|c| c.code == code && Some(c.id) != except);
        if taken {
            return Err(LeaseError::Conflict(format!(
                "Contract code '{code}' already exists"
            )));
        }
        Ok(())
    }

    fn ensure_contract_free(&self, contract_id: u64, except: Option<u64>) -> LeaseResult<()> {
        if !self.contracts.contains_key(&contract_id) {
            return Err(not_found("LeaseContract", contract_id));
        }
        let taken = self
            .financials
            .values()
            .any(|f| f.lease == contract_id && Some(f.id) != except);
        if taken {
            return Err(LeaseError::Conflict(format!(
                "Contract {contract_id} already has a financial record"
            )));
        }
        Ok(())
    }

    /// Validate, recompute present value, and store under `id`.
    fn save_financial(
        &mut self,
        id: u64,
        input: LeaseFinancialInput,
    ) -> LeaseResult<LeaseFinancialRecord> {
        input.validate()?;
        let present_value = compute_present_value(&input.terms())?;
        let record = LeaseFinancialRecord::from_input(id, input, present_value);
        info!(
            "saved financial {} for contract {} with present value {}",
            record.id, record.lease, record.present_value
        );
        self.financials.insert(id, record.clone());
        Ok(record)
    }
}

impl LeaseRepository for InMemoryLeaseStore {
    fn create_contract(&mut self, input: NewLeaseContract) -> LeaseResult<LeaseContract> {
        input.validate()?;
        self.ensure_unique_code(&input.code, None)?;
        self.next_contract_id += 1;
        let contract = LeaseContract::from_input(self.next_contract_id, input);
        info!("created contract {} ({})", contract.id, contract);
        self.contracts.insert(contract.id, contract.clone());
        Ok(contract)
    }

    fn update_contract(&mut self, id: u64, input: NewLeaseContract) -> LeaseResult<LeaseContract> {
        if !self.contracts.contains_key(&id) {
            return Err(not_found("LeaseContract", id));
        }
        input.validate()?;
        self.ensure_unique_code(&input.code, Some(id))?;
        let contract = LeaseContract::from_input(id, input);
        self.contracts.insert(id, contract.clone());
        Ok(contract)
    }

    fn get_contract(&self, id: u64) -> LeaseResult<LeaseContract> {
        self.contracts
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("LeaseContract", id))
    }

    fn list_contracts(&self) -> Vec<LeaseContract> {
        self.contracts.values().cloned().collect()
    }

    fn delete_contract(&mut self, id: u64) -> LeaseResult<()> {
        self.contracts
            .remove(&id)
            .ok_or_else(|| not_found("LeaseContract", id))?;
        let before = self.financials.len();
        self.financials.retain(|_, f| f.lease != id);
        info!(
            "deleted contract {} and {} financial record(s)",
            id,
            before - self.financials.len()
        );
        Ok(())
    }

    fn create_financial(&mut self, input: LeaseFinancialInput) -> LeaseResult<LeaseFinancialRecord> {
        self.ensure_contract_free(input.lease, None)?;
        let id = self.next_financial_id + 1;
        let record = self.save_financial(id, input)?;
        self.next_financial_id = id;
        Ok(record)
    }

    fn update_financial(
        &mut self,
        id: u64,
        input: LeaseFinancialInput,
    ) -> LeaseResult<LeaseFinancialRecord> {
        if !self.financials.contains_key(&id) {
            return Err(not_found("LeaseFinancial", id));
        }
        self.ensure_contract_free(input.lease, Some(id))?;
        self.save_financial(id, input)
    }

    fn get_financial(&self, id: u64) -> LeaseResult<LeaseFinancialRecord> {
        self.financials
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("LeaseFinancial", id))
    }

    fn financial_for_contract(&self, contract_id: u64) -> Option<LeaseFinancialRecord> {
        self.financials
            .values()
            .find(|f| f.lease == contract_id)
            .cloned()
    }

    fn list_financials(&self) -> Vec<LeaseFinancialRecord> {
        self.financials.values().cloned().collect()
    }

    fn delete_financial(&mut self, id: u64) -> LeaseResult<()> {
        self.financials
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("LeaseFinancial", id))
    }
}

fn not_found(entity: &str, id: u64) -> LeaseError {
    LeaseError::NotFound {
        entity: entity.into(),
        id,
    }
}
