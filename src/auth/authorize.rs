//! Pure authorization predicate shared by the client gate and page guard.
//!
//! The same function runs in both execution contexts, so server-rendered
//! output and the hydrated client can never disagree on a visibility
//! decision for the same identity.

#[cfg(test)]
#[path = "authorize_test.rs"]
mod authorize_test;

use crate::net::types::User;

/// A capability query: every listed permission AND every listed role must
/// be held. Empty lists request nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Requirement {
    pub permissions: Vec<String>,
    pub roles: Vec<String>,
}

impl Requirement {
    #[must_use]
    pub fn new(permissions: &[&str], roles: &[&str]) -> Self {
        Self {
            permissions: permissions.iter().map(|p| (*p).to_owned()).collect(),
            roles: roles.iter().map(|r| (*r).to_owned()).collect(),
        }
    }
}

/// Decide whether `user` satisfies `requirement`.
///
/// Most-restrictive semantics: all listed permissions AND all listed roles
/// must be present; the two clauses are themselves ANDed. An absent identity
/// always denies; an empty requirement always allows a present one.
#[must_use]
pub fn authorize(user: Option<&User>, requirement: &Requirement) -> bool {
    let Some(user) = user else {
        return false;
    };
    let permissions_ok = requirement
        .permissions
        .iter()
        .all(|permission| user.permissions.contains(permission));
    let roles_ok = requirement.roles.iter().all(|role| user.roles.contains(role));
    permissions_ok && roles_ok
}
