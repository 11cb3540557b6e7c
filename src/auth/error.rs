//! Typed failure taxonomy for the session layer.
//!
//! ERROR HANDLING
//! ==============
//! Sign-in failures are returned to callers so the UI can react instead of
//! silently logging. `SessionExpired` never escapes to UI code: the session
//! manager and the page guard both translate it into the sign-out path.

use thiserror::Error;

/// Failures surfaced by sign-in, identity restoration, and guarded pages.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The backend rejected the email/password pair.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// A stored token was present but the backend no longer accepts it.
    #[error("session expired")]
    SessionExpired,

    /// Transport-level failure, including request timeouts.
    #[error("network failure: {0}")]
    Network(String),

    /// The backend answered with a shape the client does not understand.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
