//! Session state context for the UI tree.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionContext` is constructed per browser session in `App` and
//! provided via Leptos context: route guards and identity-aware components
//! read the reactive snapshot, while the hydrate glue below drives the
//! underlying `SessionManager` and mirrors its state into the signal.
//! There is no module-level singleton; tests build their own managers over
//! stub APIs and in-memory cookies.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use leptos::prelude::*;

#[cfg(feature = "hydrate")]
use crate::auth::cookies::BrowserCookies;
#[cfg(feature = "hydrate")]
use crate::auth::error::AuthError;
#[cfg(feature = "hydrate")]
use crate::auth::guard::{LANDING_PATH, LOGIN_PATH};
#[cfg(feature = "hydrate")]
use crate::auth::session::{RestoreOutcome, SessionManager};
#[cfg(feature = "hydrate")]
use crate::net::api::{AuthApi, HttpAuthApi};
use crate::net::types::User;

/// Snapshot of the current session as seen by the UI.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Present once sign-in or restoration has succeeded.
    pub user: Option<User>,
    /// True while restore-on-load is still resolving; gated UI must not
    /// treat an empty `user` as final until this clears.
    pub loading: bool,
}

impl SessionState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Context handle provided by `App`.
///
/// The manager handle is browser-local; server rendering only ever sees the
/// reactive snapshot.
#[derive(Clone, Copy)]
pub struct SessionContext {
    pub state: RwSignal<SessionState>,
    #[cfg(feature = "hydrate")]
    manager: StoredValue<SessionManager<HttpAuthApi, BrowserCookies>, LocalStorage>,
}

impl SessionContext {
    /// Build the per-browser-session context. Restoration is kicked off
    /// separately by `App` once mounted.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwSignal::new(SessionState {
                user: None,
                loading: true,
            }),
            #[cfg(feature = "hydrate")]
            manager: StoredValue::new_local(SessionManager::new(HttpAuthApi::new(), BrowserCookies)),
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Provide a fresh session context to the tree and return it.
pub fn provide_session() -> SessionContext {
    let session = SessionContext::new();
    provide_context(session);
    session
}

/// Grab the session context provided by `App`.
#[must_use]
pub fn use_session() -> SessionContext {
    expect_context::<SessionContext>()
}

/// Mirror the manager's identity into the reactive state.
#[cfg(feature = "hydrate")]
fn sync_state(session: SessionContext, loading: bool) {
    let user = session.manager.with_value(|manager| manager.user().cloned());
    session.state.set(SessionState { user, loading });
}

/// Run restore-on-load: exchange any stored token for an identity.
///
/// With no complete credential pair the session settles unauthenticated
/// without a network call. Any fetch failure, an expired token included,
/// runs the sign-out path.
#[cfg(feature = "hydrate")]
pub fn spawn_restore(session: SessionContext) {
    let ticket = session
        .manager
        .try_update_value(|manager| manager.begin_restore())
        .flatten();
    let Some(ticket) = ticket else {
        sync_state(session, false);
        return;
    };
    let api = session.manager.with_value(|manager| manager.api().clone());
    leptos::task::spawn_local(async move {
        let result = api.fetch_identity().await;
        let outcome = session
            .manager
            .try_update_value(|manager| manager.finish_restore(ticket, result));
        if !matches!(outcome, Some(RestoreOutcome::Discarded) | None) {
            sync_state(session, false);
        }
    });
}

/// Sign in and, on success, land on the authenticated page.
///
/// State, both cookies, and the bearer header are all applied before the
/// navigation fires, so the destination page observes the new session. The
/// typed error goes to `on_error` so the form can show what went wrong.
#[cfg(feature = "hydrate")]
pub fn spawn_sign_in(
    session: SessionContext,
    email: String,
    password: String,
    on_error: impl Fn(AuthError) + 'static,
) {
    let api = session.manager.with_value(|manager| manager.api().clone());
    leptos::task::spawn_local(async move {
        match api.sign_in(&email, &password).await {
            Ok(grant) => {
                session
                    .manager
                    .try_update_value(|manager| manager.apply_sign_in(&email, &grant));
                sync_state(session, false);
                navigate_to(LANDING_PATH);
            }
            Err(err) => {
                log::warn!("sign-in failed: {err}");
                on_error(err);
            }
        }
    });
}

/// Drop the session everywhere and return to the public entry point.
///
/// Callable from an already-expired session; clearing twice is harmless.
#[cfg(feature = "hydrate")]
pub fn sign_out_now(session: SessionContext) {
    session.manager.try_update_value(|manager| manager.sign_out());
    sync_state(session, false);
    navigate_to(LOGIN_PATH);
}

#[cfg(feature = "hydrate")]
fn navigate_to(path: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href(path);
    }
}
