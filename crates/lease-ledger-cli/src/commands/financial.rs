use clap::{Args, Subcommand};
use serde_json::Value;
use std::path::Path;

use lease_ledger_core::lease::records::LeaseFinancialInput;
use lease_ledger_core::lease::resource::LeaseFinancialResource;
use lease_ledger_core::lease::store::{InMemoryLeaseStore, LeaseRepository};

use crate::input;

#[derive(Subcommand)]
pub enum FinancialCommand {
    /// Create a financial record from JSON; present value is computed on save
    Create(FinancialInputArgs),
    /// Replace a financial record's fields from JSON and recompute present value
    Update(FinancialUpdateArgs),
    /// Show a financial record with its amortization schedule
    Show(FinancialIdArgs),
    /// List all financial records with their schedules
    List,
    /// Delete a financial record
    Delete(FinancialIdArgs),
}

#[derive(Args)]
pub struct FinancialInputArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct FinancialUpdateArgs {
    /// Financial record id
    pub id: u64,
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct FinancialIdArgs {
    /// Financial record id
    pub id: u64,
}

fn read_financial(path: Option<&str>) -> Result<LeaseFinancialInput, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        input::file::read_json(path)
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Err("--input <file.json> or stdin required for financial data".into())
    }
}

pub fn run(cmd: FinancialCommand, store_path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let mut store = InMemoryLeaseStore::load(store_path)?;

    let value = match cmd {
        FinancialCommand::Create(args) => {
            let record = store.create_financial(read_financial(args.input.as_deref())?)?;
            store.save(store_path)?;
            serde_json::to_value(LeaseFinancialResource::from_record(record)?)?
        }
        FinancialCommand::Update(args) => {
            let record =
                store.update_financial(args.id, read_financial(args.input.as_deref())?)?;
            store.save(store_path)?;
            serde_json::to_value(LeaseFinancialResource::from_record(record)?)?
        }
        FinancialCommand::Show(args) => serde_json::to_value(store.financial_resource(args.id)?)?,
        FinancialCommand::List => {
            let resources = store
                .list_financials()
                .into_iter()
                .map(LeaseFinancialResource::from_record)
                .collect::<Result<Vec<_>, _>>()?;
            serde_json::to_value(resources)?
        }
        FinancialCommand::Delete(args) => {
            store.delete_financial(args.id)?;
            store.save(store_path)?;
            serde_json::json!({ "deleted": args.id })
        }
    };

    Ok(value)
}
