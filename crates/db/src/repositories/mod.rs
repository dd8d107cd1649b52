//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod account_repo;
pub mod plan_repo;
pub mod role_repo;
pub mod session_repo;
pub mod subscription_repo;

pub use account_repo::AccountRepo;
pub use plan_repo::PlanRepo;
pub use role_repo::RoleRepo;
pub use session_repo::{SessionError, SessionRepo};
pub use subscription_repo::SubscriptionRepo;
