pub mod contract;
pub mod financial;
pub mod lease;
