//! Credential persistence over the shared cookie medium.
//!
//! ARCHITECTURE
//! ============
//! The two credential cookies are the only state shared between the browser
//! and each server-rendered request. Everything goes through the
//! `CredentialStore` trait so the session manager and the page guard run
//! identically against `document.cookie`, an incoming request's cookie
//! header, or an in-memory map in tests.
//!
//! The pair is written and cleared together; a partial pair reads as no
//! credential at all. An unavailable storage medium also reads as empty and
//! never errors outward.

#[cfg(test)]
#[path = "cookies_test.rs"]
mod cookies_test;

/// Cookie key holding the access token.
pub const TOKEN_COOKIE: &str = "auth.token";

/// Cookie key holding the refresh token.
pub const REFRESH_COOKIE: &str = "auth.refreshToken";

/// Persistence window for both credential cookies: 30 days.
pub const CREDENTIAL_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 30;

/// Write options for a credential cookie.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CookieOptions {
    pub max_age_secs: u64,
    pub path: &'static str,
}

impl CookieOptions {
    /// Root-scoped cookie with the 30-day credential window.
    #[must_use]
    pub fn credential() -> Self {
        Self {
            max_age_secs: CREDENTIAL_MAX_AGE_SECS,
            path: "/",
        }
    }

    /// Root-scoped cookie that expires immediately, i.e. a deletion.
    #[must_use]
    pub fn expired() -> Self {
        Self {
            max_age_secs: 0,
            path: "/",
        }
    }
}

/// Key/value storage scoped to one browser or one server-rendered request.
///
/// Reads never fail outward: an unavailable medium looks empty.
pub trait CredentialStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str, options: CookieOptions);
    fn remove(&self, key: &str);
}

impl<S: CredentialStore> CredentialStore for std::rc::Rc<S> {
    fn get(&self, key: &str) -> Option<String> {
        S::get(self, key)
    }

    fn set(&self, key: &str, value: &str, options: CookieOptions) {
        S::set(self, key, value, options);
    }

    fn remove(&self, key: &str) {
        S::remove(self, key);
    }
}

/// Both credential entries, present and non-empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Read the credential pair, treating partial or empty state as absent.
pub fn read_credentials<S: CredentialStore>(store: &S) -> Option<CredentialPair> {
    let access_token = store.get(TOKEN_COOKIE).filter(|v| !v.is_empty())?;
    let refresh_token = store.get(REFRESH_COOKIE).filter(|v| !v.is_empty())?;
    Some(CredentialPair {
        access_token,
        refresh_token,
    })
}

/// Write both entries together with the 30-day window and root path.
pub fn write_credentials<S: CredentialStore>(store: &S, access_token: &str, refresh_token: &str) {
    store.set(TOKEN_COOKIE, access_token, CookieOptions::credential());
    store.set(REFRESH_COOKIE, refresh_token, CookieOptions::credential());
}

/// Delete both entries together. Safe to call when already empty.
pub fn clear_credentials<S: CredentialStore>(store: &S) {
    store.remove(TOKEN_COOKIE);
    store.remove(REFRESH_COOKIE);
}

/// Extract a cookie value from a `Cookie:`-header-shaped string
/// (`"a=1; b=2"`), as exposed by `document.cookie`.
#[must_use]
pub fn parse_cookie_header(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_owned())
}

/// Render a cookie assignment string for `Set-Cookie` / `document.cookie`.
///
/// Not `HttpOnly`: the browser context reads the token back on load to
/// decide whether restoration should run.
#[must_use]
pub fn format_set_cookie(name: &str, value: &str, options: CookieOptions) -> String {
    format!(
        "{name}={value}; Max-Age={}; Path={}; SameSite=Lax",
        options.max_age_secs, options.path
    )
}

/// Credential store over `document.cookie`.
///
/// Server rendering uses `RequestCookies` instead, so this type is only
/// compiled for the browser.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserCookies;

#[cfg(feature = "hydrate")]
impl BrowserCookies {
    fn document() -> Option<web_sys::HtmlDocument> {
        use wasm_bindgen::JsCast;
        web_sys::window()?
            .document()?
            .dyn_into::<web_sys::HtmlDocument>()
            .ok()
    }
}

#[cfg(feature = "hydrate")]
impl CredentialStore for BrowserCookies {
    fn get(&self, key: &str) -> Option<String> {
        let header = Self::document()?.cookie().ok()?;
        parse_cookie_header(&header, key)
    }

    fn set(&self, key: &str, value: &str, options: CookieOptions) {
        if let Some(document) = Self::document() {
            let _ = document.set_cookie(&format_set_cookie(key, value, options));
        }
    }

    fn remove(&self, key: &str) {
        self.set(key, "", CookieOptions::expired());
    }
}

/// Request-scoped credential store for server rendering.
///
/// Reads come from the incoming request's cookie jar; writes and deletions
/// go out as `Set-Cookie` response headers, so guard-side cleanup is visible
/// to the browser on the next load.
#[cfg(feature = "ssr")]
pub struct RequestCookies {
    jar: axum_extra::extract::cookie::CookieJar,
    response: leptos_axum::ResponseOptions,
}

#[cfg(feature = "ssr")]
impl RequestCookies {
    #[must_use]
    pub fn new(jar: axum_extra::extract::cookie::CookieJar, response: leptos_axum::ResponseOptions) -> Self {
        Self { jar, response }
    }
}

#[cfg(feature = "ssr")]
impl CredentialStore for RequestCookies {
    fn get(&self, key: &str) -> Option<String> {
        self.jar.get(key).map(|cookie| cookie.value().to_owned())
    }

    fn set(&self, key: &str, value: &str, options: CookieOptions) {
        if let Ok(header) = http::HeaderValue::from_str(&format_set_cookie(key, value, options)) {
            self.response.append_header(http::header::SET_COOKIE, header);
        }
    }

    fn remove(&self, key: &str) {
        self.set(key, "", CookieOptions::expired());
    }
}
