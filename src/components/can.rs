//! Render gate applying the authorization check to child content.

#[cfg(test)]
#[path = "can_test.rs"]
mod can_test;

use leptos::prelude::*;

use crate::auth::authorize::{Requirement, authorize};
use crate::net::types::User;
use crate::state::session::use_session;

/// The gate's visibility decision, factored pure for tests.
fn gate_allows(user: Option<&User>, requirement: &Requirement) -> bool {
    authorize(user, requirement)
}

/// Renders its children only when the current session satisfies every
/// listed permission and role; otherwise renders nothing at all, with no
/// error and no placeholder. Re-evaluates whenever the session changes.
#[component]
pub fn Can(
    /// Permissions that must all be held.
    #[prop(optional)]
    permissions: Vec<String>,
    /// Roles that must all be held.
    #[prop(optional)]
    roles: Vec<String>,
    children: ChildrenFn,
) -> impl IntoView {
    let state = use_session().state;
    let requirement = Requirement { permissions, roles };

    move || {
        let snapshot = state.get();
        gate_allows(snapshot.user.as_ref(), &requirement).then(|| children())
    }
}
