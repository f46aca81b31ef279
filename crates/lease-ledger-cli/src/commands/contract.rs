use clap::{Args, Subcommand};
use serde_json::Value;
use std::path::Path;

use lease_ledger_core::lease::records::NewLeaseContract;
use lease_ledger_core::lease::store::{InMemoryLeaseStore, LeaseRepository};

use crate::input;

#[derive(Subcommand)]
pub enum ContractCommand {
    /// Create a contract from JSON
    Create(ContractInputArgs),
    /// Replace a contract's fields from JSON
    Update(ContractUpdateArgs),
    /// Show a contract with its embedded financial record
    Show(ContractIdArgs),
    /// List all contracts
    List,
    /// Delete a contract and its financial record
    Delete(ContractIdArgs),
}

#[derive(Args)]
pub struct ContractInputArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct ContractUpdateArgs {
    /// Contract id
    pub id: u64,
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct ContractIdArgs {
    /// Contract id
    pub id: u64,
}

fn read_contract(path: Option<&str>) -> Result<NewLeaseContract, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        input::file::read_json(path)
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Err("--input <file.json> or stdin required for contract data".into())
    }
}

pub fn run(cmd: ContractCommand, store_path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let mut store = InMemoryLeaseStore::load(store_path)?;

    let value = match cmd {
        ContractCommand::Create(args) => {
            let contract = store.create_contract(read_contract(args.input.as_deref())?)?;
            store.save(store_path)?;
            serde_json::to_value(contract)?
        }
        ContractCommand::Update(args) => {
            let contract =
                store.update_contract(args.id, read_contract(args.input.as_deref())?)?;
            store.save(store_path)?;
            serde_json::to_value(contract)?
        }
        ContractCommand::Show(args) => serde_json::to_value(store.contract_resource(args.id)?)?,
        ContractCommand::List => serde_json::to_value(store.list_contracts())?,
        ContractCommand::Delete(args) => {
            store.delete_contract(args.id)?;
            store.save(store_path)?;
            serde_json::json!({ "deleted": args.id })
        }
    };

    Ok(value)
}
