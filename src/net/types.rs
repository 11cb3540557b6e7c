//! Wire DTOs for the auth endpoints.
//!
//! DESIGN
//! ======
//! Decoding is strict: every field the client relies on is a required serde
//! field, and a shape mismatch surfaces as `AuthError::MalformedResponse`
//! instead of propagating missing data silently.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

use crate::auth::error::AuthError;

/// The authenticated user's identity snapshot, as returned by `/me`.
///
/// Immutable once fetched; replaced wholesale on re-authentication.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account email, also the display identity.
    pub email: String,
    /// Fine-grained capability strings (e.g. `"metrics.list"`).
    pub permissions: Vec<String>,
    /// Coarse-grained role labels (e.g. `"administrator"`).
    pub roles: Vec<String>,
}

/// Sign-in request body for `POST /sessions`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Successful sign-in response: the token pair plus capability lists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionGrant {
    pub token: String,
    pub refresh_token: String,
    pub permissions: Vec<String>,
    pub roles: Vec<String>,
}

/// Decode a JSON body, mapping any shape mismatch to `MalformedResponse`.
pub fn decode_body<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, AuthError> {
    serde_json::from_str(body).map_err(|err| AuthError::MalformedResponse(err.to_string()))
}
