use napi::Result as NapiResult;
use napi_derive::napi;

use lease_ledger_core::lease::{engine, records, resource, terms};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Present value of the lease terms, as a decimal string.
#[napi]
pub fn compute_present_value(input_json: String) -> NapiResult<String> {
    let input: terms::LeaseTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = engine::compute_present_value(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Fresh present value plus schedule, wrapped in the computation envelope.
#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: terms::LeaseTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = engine::amortize(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Expand a stored financial record into its resource shape, schedule included.
#[napi]
pub fn lease_financial_resource(record_json: String) -> NapiResult<String> {
    let record: records::LeaseFinancialRecord =
        serde_json::from_str(&record_json).map_err(to_napi_error)?;
    let output = resource::LeaseFinancialResource::from_record(record).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
