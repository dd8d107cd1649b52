//! Entity models and DTOs, one module per table.

pub mod account;
pub mod plan;
pub mod role;
pub mod session;
