//! Auth API handle for the browser context.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`, carrying the
//! shared bearer header and an explicit request timeout. Server-side page
//! preparation builds its own request-scoped handle (`net::server_api`), so
//! nothing here runs during SSR.
//!
//! ERROR HANDLING
//! ==============
//! Every failure maps into the `AuthError` taxonomy at this boundary:
//! rejected credentials, expired sessions, transport errors (including
//! timeouts), and undecodable bodies are all distinct to callers.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use crate::auth::error::AuthError;
use crate::net::types::{SessionGrant, User};

/// Seconds before an in-flight auth call is abandoned as a network failure.
pub const REQUEST_TIMEOUT_SECS: u32 = 10;

/// Sign-in endpoint, relative to the page origin (browser) or the backend
/// base URL (server).
pub const SESSIONS_ENDPOINT: &str = "/api/sessions";

/// Identity endpoint, same addressing as [`SESSIONS_ENDPOINT`].
pub const ME_ENDPOINT: &str = "/api/me";

#[cfg(any(test, feature = "hydrate"))]
fn status_failure_message(endpoint: &str, status: u16) -> String {
    format!("{endpoint} failed with status {status}")
}

#[cfg(any(test, feature = "hydrate"))]
fn timeout_message(endpoint: &str) -> String {
    format!("{endpoint} timed out after {REQUEST_TIMEOUT_SECS}s")
}

/// Backend auth endpoints, abstracted so the session manager can run
/// against a scripted stub in tests.
#[allow(async_fn_in_trait)]
pub trait AuthApi {
    /// Install (or clear) the default bearer token attached to later calls.
    fn set_bearer(&self, token: Option<&str>);

    /// `POST /sessions` with `{email, password}`.
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionGrant, AuthError>;

    /// `GET /me` using the current bearer token.
    async fn fetch_identity(&self) -> Result<User, AuthError>;
}

/// Race a request future against the request timeout.
#[cfg(feature = "hydrate")]
async fn with_timeout<T>(
    endpoint: &str,
    request: impl Future<Output = Result<T, AuthError>>,
) -> Result<T, AuthError> {
    use futures::future::{Either, select};

    let timeout = gloo_timers::future::TimeoutFuture::new(REQUEST_TIMEOUT_SECS * 1_000);
    futures::pin_mut!(request);
    futures::pin_mut!(timeout);
    match select(request, timeout).await {
        Either::Left((outcome, _)) => outcome,
        Either::Right(((), _)) => Err(AuthError::Network(timeout_message(endpoint))),
    }
}

/// `gloo-net` backed auth API carrying the shared bearer header.
///
/// Clones share the bearer cell, so one handle installed at sign-in is
/// visible to every later caller in this browser context.
#[cfg(feature = "hydrate")]
#[derive(Clone, Debug, Default)]
pub struct HttpAuthApi {
    bearer: std::rc::Rc<std::cell::RefCell<Option<String>>>,
}

#[cfg(feature = "hydrate")]
impl HttpAuthApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn bearer_header(&self) -> Option<String> {
        self.bearer.borrow().clone()
    }
}

#[cfg(feature = "hydrate")]
impl AuthApi for HttpAuthApi {
    fn set_bearer(&self, token: Option<&str>) {
        *self.bearer.borrow_mut() = token.map(|t| format!("Bearer {t}"));
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionGrant, AuthError> {
        let body = crate::net::types::Credentials {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        let request = async {
            let response = gloo_net::http::Request::post(SESSIONS_ENDPOINT)
                .json(&body)
                .map_err(|err| AuthError::Network(err.to_string()))?
                .send()
                .await
                .map_err(|err| AuthError::Network(err.to_string()))?;
            match response.status() {
                200..=299 => {
                    let text = response
                        .text()
                        .await
                        .map_err(|err| AuthError::Network(err.to_string()))?;
                    crate::net::types::decode_body(&text)
                }
                401 | 403 => Err(AuthError::InvalidCredentials),
                status => Err(AuthError::Network(status_failure_message(SESSIONS_ENDPOINT, status))),
            }
        };
        with_timeout(SESSIONS_ENDPOINT, request).await
    }

    async fn fetch_identity(&self) -> Result<User, AuthError> {
        let bearer = self.bearer_header();
        let request = async {
            let mut builder = gloo_net::http::Request::get(ME_ENDPOINT);
            if let Some(bearer) = bearer.as_deref() {
                builder = builder.header("Authorization", bearer);
            }
            let response = builder
                .send()
                .await
                .map_err(|err| AuthError::Network(err.to_string()))?;
            match response.status() {
                200..=299 => {
                    let text = response
                        .text()
                        .await
                        .map_err(|err| AuthError::Network(err.to_string()))?;
                    crate::net::types::decode_body(&text)
                }
                401 | 403 => Err(AuthError::SessionExpired),
                status => Err(AuthError::Network(status_failure_message(ME_ENDPOINT, status))),
            }
        };
        with_timeout(ME_ENDPOINT, request).await
    }
}
