//! Authentication and authorization primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- the token codec (HS256 issue and verify).
//! - [`oauth`] -- third-party provider code exchange.
//! - [`identity`] -- find-or-create accounts from provider profiles.
//! - [`gateway`] -- register, password login, and logout flows.
//! - [`cookie`] -- the `auth_token` browser cookie.

pub mod cookie;
pub mod gateway;
pub mod identity;
pub mod jwt;
pub mod oauth;
pub mod password;
