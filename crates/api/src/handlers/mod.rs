pub mod auth;
pub mod oauth;
pub mod plans;
pub mod profile;
pub mod session;
