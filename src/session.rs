//! Session and profile values published into the auth slice.
//!
//! SYSTEM CONTEXT
//! ==============
//! A `Session` is what the rest of the application reads through the auth
//! selectors. It is built in one piece from the identity-provider tokens and
//! the user profile, and replaced in one piece; fields are never patched.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded JWT claims, kept as an open JSON object.
pub type Payload = Map<String, Value>;

/// User profile supplied by the identity provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub allow_marketing: bool,
    /// Any further attributes the provider returns.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    /// Parse a profile from identity-provider attribute JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when required attributes are missing
    /// or mistyped.
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// `"First Last"`, or whichever half is present, or the email.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() { self.email.clone() } else { full.to_owned() }
    }
}

/// Tokens plus profile for the signed-in user, as stored in the auth slice.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Access token JWT.
    pub access_token: String,
    /// Access token claims.
    pub access_payload: Payload,
    /// Id token JWT.
    pub id_token: String,
    /// Id token claims.
    pub id_payload: Payload,
    /// Profile shared with the auth context that produced this session.
    pub profile: Arc<Profile>,
}
