//! Well-known role names and the account role assignment type.
//!
//! Names must match the seed data in `20250101000002_create_roles.sql`.

use serde::Serialize;

use crate::types::DbId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MENTOR: &str = "mentor";
pub const ROLE_ENTREPRENEUR: &str = "entrepreneur";

/// Roles a user may pick for themselves via `POST /user/select-role`.
///
/// `admin` is only granted out of band.
pub const SELECTABLE_ROLES: &[&str] = &[ROLE_MENTOR, ROLE_ENTREPRENEUR];

/// Returns `true` if `name` is a role users may assign to themselves.
pub fn is_selectable(name: &str) -> bool {
    SELECTABLE_ROLES.contains(&name)
}

/// The role state of an account.
///
/// Accounts start [`RoleAssignment::Unassigned`] and move to
/// [`RoleAssignment::Assigned`] once a role is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "role_id", rename_all = "snake_case")]
pub enum RoleAssignment {
    Unassigned,
    Assigned(DbId),
}

impl RoleAssignment {
    pub fn role_id(self) -> Option<DbId> {
        match self {
            RoleAssignment::Unassigned => None,
            RoleAssignment::Assigned(id) => Some(id),
        }
    }
}

impl From<Option<DbId>> for RoleAssignment {
    fn from(value: Option<DbId>) -> Self {
        value.map_or(RoleAssignment::Unassigned, RoleAssignment::Assigned)
    }
}
