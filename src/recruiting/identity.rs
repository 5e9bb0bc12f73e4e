//! Identity-facing types. Authentication is delegated to an external
//! provider; the core only consumes the `(subject id, role)` it is handed.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Hr,
    Student,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Hr => "HR",
            Role::Student => "STUDENT",
        }
    }
}

/// The acting principal as supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub subject_id: String,
    pub role: Role,
}

/// Reconcile a synced user's role against what they actually own. A user
/// with a company or posted jobs is HR regardless of the declared role;
/// everyone else keeps their declaration, defaulting to student. Pure and
/// idempotent, intended to be invoked by the identity-sync collaborator.
pub fn reconcile_role(declared: Option<Role>, owns_company: bool, posted_jobs: bool) -> Role {
    if owns_company || posted_jobs {
        return Role::Hr;
    }
    declared.unwrap_or(Role::Student)
}
