//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- verified identity from a bearer token or the `auth_token` cookie.
//! - [`auth::BearerToken`] -- the raw, unverified token (used by logout).
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.

pub mod auth;
pub mod rbac;
