//! Lease financial terms, the amortization engine, and the record layer
//! that keeps each record's present value current.

pub mod engine;
pub mod records;
pub mod resource;
pub mod terms;

#[cfg(feature = "store")]
pub mod store;
