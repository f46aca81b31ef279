pub mod calendar;
pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "lease")]
pub mod lease;

pub use error::LeaseError;
pub use types::*;

/// Standard result type for all lease-ledger operations
pub type LeaseResult<T> = Result<T, LeaseError>;
