//! Session lifecycle: sign-in, restore-on-load, sign-out.
//!
//! ARCHITECTURE
//! ============
//! The manager is platform-pure: it reaches the backend through `AuthApi`
//! and persistence through `CredentialStore`, so the same state machine runs
//! under a scripted stub in tests and under `gloo-net` in the browser.
//!
//! Restoration is split into `begin_restore`/`finish_restore` so a caller
//! sharing the manager behind a `RefCell` never holds a borrow across the
//! network await, and so a response that raced a later sign-in or sign-out
//! is discarded instead of applied to the new session.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::auth::cookies::{CredentialStore, clear_credentials, read_credentials, write_credentials};
use crate::auth::error::AuthError;
use crate::net::api::AuthApi;
use crate::net::types::{SessionGrant, User};

/// Lifecycle phase of the client session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Unauthenticated,
    /// A stored token is being exchanged for an identity.
    Restoring,
    Authenticated,
}

/// Ties an in-flight restoration to the session epoch it started under.
#[derive(Clone, Copy, Debug)]
pub struct RestoreTicket {
    epoch: u64,
}

/// How a restoration attempt resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Identity fetched and installed.
    Authenticated,
    /// The identity fetch failed; the sign-out path ran.
    SignedOut(AuthError),
    /// No complete credential pair was stored; no network call was made.
    NoCredentials,
    /// The session changed while the fetch was in flight; result dropped.
    Discarded,
}

/// Orchestrates the session state machine over an auth API and a
/// credential store.
///
/// One manager is bound to one browser context for its lifetime; server
/// requests never see it (they go through the page guard instead).
pub struct SessionManager<A, S> {
    api: A,
    cookies: S,
    user: Option<User>,
    phase: SessionPhase,
    epoch: u64,
}

impl<A: AuthApi, S: CredentialStore> SessionManager<A, S> {
    /// Build a manager over the given API handle and credential store.
    ///
    /// Any persisted access token is installed as the bearer default right
    /// away, so the first identity fetch after a reload is authenticated.
    pub fn new(api: A, cookies: S) -> Self {
        if let Some(pair) = read_credentials(&cookies) {
            api.set_bearer(Some(&pair.access_token));
        }
        Self {
            api,
            cookies,
            user: None,
            phase: SessionPhase::default(),
            epoch: 0,
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Install a successful sign-in: identity, both cookies, bearer header.
    ///
    /// A repeat sign-in replaces the identity wholesale; the later
    /// credential write wins.
    pub fn apply_sign_in(&mut self, email: &str, grant: &SessionGrant) {
        write_credentials(&self.cookies, &grant.token, &grant.refresh_token);
        self.api.set_bearer(Some(&grant.token));
        self.user = Some(User {
            email: email.to_owned(),
            permissions: grant.permissions.clone(),
            roles: grant.roles.clone(),
        });
        self.phase = SessionPhase::Authenticated;
        self.epoch += 1;
        log::info!("session established for {email}");
    }

    /// Sign in against the backend.
    ///
    /// # Errors
    ///
    /// On failure the session state and the credential store are left
    /// untouched and the typed error is returned for the UI to present.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<(), AuthError> {
        match self.api.sign_in(email, password).await {
            Ok(grant) => {
                self.apply_sign_in(email, &grant);
                Ok(())
            }
            Err(err) => {
                log::warn!("sign-in failed: {err}");
                Err(err)
            }
        }
    }

    /// Clear the session: both cookies, the identity, and the bearer header.
    ///
    /// Idempotent; callable from an already-expired or empty session.
    pub fn sign_out(&mut self) {
        clear_credentials(&self.cookies);
        self.api.set_bearer(None);
        self.user = None;
        self.phase = SessionPhase::Unauthenticated;
        self.epoch += 1;
    }

    /// Start restoration from the persisted credential pair.
    ///
    /// Returns `None` when no complete pair is stored: the session stays
    /// unauthenticated and no network call should be made.
    pub fn begin_restore(&mut self) -> Option<RestoreTicket> {
        let pair = read_credentials(&self.cookies)?;
        self.api.set_bearer(Some(&pair.access_token));
        self.phase = SessionPhase::Restoring;
        Some(RestoreTicket { epoch: self.epoch })
    }

    /// Apply the identity fetch that `begin_restore` kicked off.
    ///
    /// A result arriving after the session has since changed is discarded.
    /// Any fetch failure, an expired token included, runs the sign-out path.
    pub fn finish_restore(&mut self, ticket: RestoreTicket, result: Result<User, AuthError>) -> RestoreOutcome {
        if ticket.epoch != self.epoch {
            return RestoreOutcome::Discarded;
        }
        match result {
            Ok(user) => {
                log::info!("session restored for {}", user.email);
                self.user = Some(user);
                self.phase = SessionPhase::Authenticated;
                RestoreOutcome::Authenticated
            }
            Err(err) => {
                log::warn!("identity fetch failed, signing out: {err}");
                self.sign_out();
                RestoreOutcome::SignedOut(err)
            }
        }
    }

    /// Restore in one step, for callers that own the manager exclusively.
    pub async fn restore(&mut self) -> RestoreOutcome {
        let Some(ticket) = self.begin_restore() else {
            return RestoreOutcome::NoCredentials;
        };
        let result = self.api.fetch_identity().await;
        self.finish_restore(ticket, result)
    }
}
