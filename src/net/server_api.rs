//! Request-scoped API handle for server-side page preparation.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each server-rendered request constructs its own handle, pre-authenticated
//! with the token read from that request's cookies. Nothing is shared across
//! requests; the handle lives exactly as long as the page preparation it
//! serves.

use std::time::Duration;

use crate::auth::error::AuthError;
use crate::net::api::{ME_ENDPOINT, REQUEST_TIMEOUT_SECS};
use crate::net::types::User;

/// Environment variable naming the backend base URL.
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

const DEFAULT_API_BASE_URL: &str = "http://localhost:3333";

/// Resolve the backend base URL from the environment.
#[must_use]
pub fn api_base_url() -> String {
    std::env::var(API_BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned())
}

/// Pre-authenticated, per-request handle to the auth backend.
pub struct ServerApi {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl ServerApi {
    #[must_use]
    pub fn new(token: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(u64::from(REQUEST_TIMEOUT_SECS)))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: api_base_url(),
            token,
        }
    }

    /// Token this handle was constructed with.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// `GET /api/me` with the request's bearer token.
    ///
    /// # Errors
    ///
    /// `SessionExpired` when the backend rejects the token, `Network` for
    /// transport failures and unexpected statuses, `MalformedResponse` for
    /// an undecodable body.
    pub async fn me(&self) -> Result<User, AuthError> {
        let url = format!("{}{ME_ENDPOINT}", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|err| AuthError::Network(err.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AuthError::SessionExpired);
        }
        if !status.is_success() {
            return Err(AuthError::Network(format!("{ME_ENDPOINT} failed with status {status}")));
        }

        let text = response
            .text()
            .await
            .map_err(|err| AuthError::Network(err.to_string()))?;
        crate::net::types::decode_body(&text)
    }
}
