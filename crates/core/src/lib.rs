//! Mentorly core domain primitives.
//!
//! This crate has no internal dependencies so it can be shared by the
//! repository layer, the API server, and any future tooling.

pub mod error;
pub mod hashing;
pub mod roles;
pub mod session_id;
pub mod types;
