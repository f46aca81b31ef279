#![cfg(feature = "store")]

use chrono::NaiveDate;
use lease_ledger_core::lease::engine::compute_present_value;
use lease_ledger_core::lease::records::{
    ContractStatus, LeaseFinancialInput, NewLeaseContract,
};
use lease_ledger_core::lease::store::{InMemoryLeaseStore, LeaseRepository};
use lease_ledger_core::lease::terms::{Computation, PeriodUnit};
use lease_ledger_core::LeaseError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn office_contract(code: &str) -> NewLeaseContract {
    NewLeaseContract {
        code: code.to_string(),
        lease_type: "Office".to_string(),
        description: None,
        leasor_name: "Riverside Properties".to_string(),
        contract_date: d(2024, 1, 1),
        status: ContractStatus::Active,
    }
}

fn office_financial(lease: u64) -> LeaseFinancialInput {
    LeaseFinancialInput {
        lease,
        contract_amount: dec!(30000),
        deposit: dec!(2000),
        down_payment: dec!(5000),
        other_cost: Decimal::ZERO,
        dismantling_cost: Decimal::ZERO,
        currency: "MMK".to_string(),
        home_currency: "USD".to_string(),
        exchange_rate: dec!(2100.0000),
        start_date: d(2024, 1, 1),
        end_date: d(2026, 12, 31),
        lease_term: 3,
        lease_period: PeriodUnit::Year,
        discount_rate: 10.0,
        payment_amount: dec!(10000),
        payment_period: PeriodUnit::Year,
        computation: Computation::Year,
        changing_date: None,
        changing_amount: Decimal::ZERO,
        reason: None,
    }
}

#[test]
fn test_full_lifecycle() {
    let mut store = InMemoryLeaseStore::new();
    let contract = store.create_contract(office_contract("OF-2024-01")).unwrap();
    let financial = store.create_financial(office_financial(contract.id)).unwrap();

    // Exchange rate is stored but does not affect the computation.
    assert_eq!(financial.present_value, dec!(29868.52));

    let resource = store.contract_resource(contract.id).unwrap();
    assert_eq!(resource.contract.code, "OF-2024-01");
    let embedded = resource.financial.unwrap();
    assert_eq!(embedded.amortization_schedule.len(), 3);
    assert_eq!(
        embedded.amortization_schedule[0].opening_balance,
        dec!(29868.52)
    );

    let mut amended = office_financial(contract.id);
    amended.changing_date = Some(d(2025, 1, 1));
    amended.changing_amount = dec!(12000);
    amended.reason = Some("Rent review".to_string());
    let updated = store.update_financial(financial.id, amended.clone()).unwrap();
    assert_eq!(
        updated.present_value,
        compute_present_value(&amended.terms()).unwrap()
    );
    assert!(updated.present_value > financial.present_value);

    let resource = store.financial_resource(financial.id).unwrap();
    let payments: Vec<Decimal> = resource
        .amortization_schedule
        .iter()
        .map(|r| r.payment)
        .collect();
    assert_eq!(payments, vec![dec!(10000), dec!(12000), dec!(12000)]);
}

#[test]
fn test_snapshot_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leases.json");

    let mut store = InMemoryLeaseStore::new();
    let contract = store.create_contract(office_contract("OF-1")).unwrap();
    let financial = store.create_financial(office_financial(contract.id)).unwrap();
    store.save(&path).unwrap();

    let mut reloaded = InMemoryLeaseStore::load(&path).unwrap();
    assert_eq!(reloaded.get_contract(contract.id).unwrap(), contract);
    assert_eq!(reloaded.get_financial(financial.id).unwrap(), financial);

    // Id sequence continues after reload.
    let next = reloaded.create_contract(office_contract("OF-2")).unwrap();
    assert_eq!(next.id, contract.id + 1);
}

#[test]
fn test_load_missing_snapshot_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemoryLeaseStore::load(&dir.path().join("absent.json")).unwrap();
    assert!(store.list_contracts().is_empty());
}

#[test]
fn test_load_corrupt_snapshot_is_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = InMemoryLeaseStore::load(&path).unwrap_err();
    assert!(matches!(err, LeaseError::SerializationError(_)));
}

#[test]
fn test_moving_financial_to_occupied_contract_rejected() {
    let mut store = InMemoryLeaseStore::new();
    let a = store.create_contract(office_contract("A")).unwrap();
    let b = store.create_contract(office_contract("B")).unwrap();
    store.create_financial(office_financial(a.id)).unwrap();
    let fb = store.create_financial(office_financial(b.id)).unwrap();

    let err = store.update_financial(fb.id, office_financial(a.id)).unwrap_err();
    assert!(matches!(err, LeaseError::Conflict(_)));
}
