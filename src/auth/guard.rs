//! Server-side page guard wrapping page-preparation logic.
//!
//! ARCHITECTURE
//! ============
//! The guard core is a plain async function over `CredentialStore`, so the
//! allow/deny behavior is testable without an HTTP stack. The `ssr` wiring
//! below binds it to the incoming request's cookies and to `leptos_axum`
//! redirects for use inside `#[server]` page-preparation functions.
//!
//! An expired token discovered mid-preparation clears both credential
//! cookies and redirects, rather than letting the raw error crash the
//! render.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::future::Future;

use crate::auth::cookies::{CredentialStore, clear_credentials, read_credentials};
use crate::auth::error::AuthError;

/// Public entry path used for guard denials and sign-out.
pub const LOGIN_PATH: &str = "/";

/// Landing path after a successful sign-in.
pub const LANDING_PATH: &str = "/dashboard";

/// Result of running guarded page preparation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardOutcome<T> {
    /// The wrapped logic ran; its value passes through unchanged.
    Allow(T),
    /// No usable session: the response must redirect to the public entry.
    RedirectToLogin,
}

/// Run `page` only when the request carries a complete credential pair.
///
/// The access token is handed to `page` so it can construct a
/// pre-authenticated API handle. A `SessionExpired` failure from the page
/// clears both credential cookies and converts into a redirect.
///
/// # Errors
///
/// Failures other than an expired session propagate unchanged.
pub async fn guard_page<S, F, Fut, T>(store: &S, page: F) -> Result<GuardOutcome<T>, AuthError>
where
    S: CredentialStore,
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<T, AuthError>>,
{
    let Some(pair) = read_credentials(store) else {
        return Ok(GuardOutcome::RedirectToLogin);
    };
    match page(pair.access_token).await {
        Ok(value) => Ok(GuardOutcome::Allow(value)),
        Err(AuthError::SessionExpired) => {
            log::warn!("guarded page hit an expired session, redirecting");
            clear_credentials(store);
            Ok(GuardOutcome::RedirectToLogin)
        }
        Err(err) => Err(err),
    }
}

/// Run guarded page preparation inside a `#[server]` function.
///
/// Reads the request's cookies, hands the wrapped logic a request-scoped
/// `ServerApi` pre-authenticated with the stored token, and translates a
/// denial into a redirect to the public entry point.
///
/// # Errors
///
/// Denials and propagated page failures both surface as `ServerFnError`;
/// the redirect has already been recorded on the response by then.
#[cfg(feature = "ssr")]
pub async fn with_page_auth<F, Fut, T>(page: F) -> Result<T, leptos::prelude::ServerFnError>
where
    F: FnOnce(crate::net::server_api::ServerApi) -> Fut,
    Fut: Future<Output = Result<T, AuthError>>,
{
    use axum_extra::extract::cookie::CookieJar;

    use crate::auth::cookies::RequestCookies;
    use crate::net::server_api::ServerApi;

    let jar: CookieJar = leptos_axum::extract().await?;
    let response = leptos::prelude::expect_context::<leptos_axum::ResponseOptions>();
    let cookies = RequestCookies::new(jar, response);

    match guard_page(&cookies, |token| page(ServerApi::new(token))).await {
        Ok(GuardOutcome::Allow(value)) => Ok(value),
        Ok(GuardOutcome::RedirectToLogin) => {
            leptos_axum::redirect(LOGIN_PATH);
            Err(leptos::prelude::ServerFnError::new("authentication required"))
        }
        Err(err) => Err(leptos::prelude::ServerFnError::new(err.to_string())),
    }
}
