//! External auth context consumed by the injector.
//!
//! SYSTEM CONTEXT
//! ==============
//! The identity provider integration (sign-in forms, token refresh, sign-out)
//! lives outside this crate. It hands us an `AuthContext` value; we only read
//! the profile and the two tokens from it.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use std::fmt;
use std::sync::Arc;

use crate::session::{Payload, Profile};

/// A JWT as exposed by the identity provider: raw token plus decoded claims.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JwtToken {
    jwt: String,
    payload: Payload,
}

impl JwtToken {
    #[must_use]
    pub fn new(jwt: impl Into<String>, payload: Payload) -> Self {
        Self { jwt: jwt.into(), payload }
    }

    /// Raw encoded token.
    #[must_use]
    pub fn jwt_token(&self) -> &str {
        &self.jwt
    }

    /// Decoded claims.
    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

/// Signed-in session held by the identity provider.
pub trait ProviderSession: Send + Sync {
    fn access_token(&self) -> JwtToken;
    fn id_token(&self) -> JwtToken;
}

/// `ProviderSession` over tokens that are already known.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StaticSession {
    pub access: JwtToken,
    pub id: JwtToken,
}

impl ProviderSession for StaticSession {
    fn access_token(&self) -> JwtToken {
        self.access.clone()
    }

    fn id_token(&self) -> JwtToken {
        self.id.clone()
    }
}

/// Snapshot of the identity provider's state.
///
/// Both fields are shared references; the injector treats a new `Arc` as a
/// change even when the contents are equal.
#[derive(Clone, Default)]
pub struct AuthContext {
    pub profile: Option<Arc<Profile>>,
    pub session: Option<Arc<dyn ProviderSession>>,
}

impl AuthContext {
    #[must_use]
    pub fn new(profile: Arc<Profile>, session: Arc<dyn ProviderSession>) -> Self {
        Self { profile: Some(profile), session: Some(session) }
    }

    /// True when both the profile and the session are present.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.profile.is_some() && self.session.is_some()
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("profile", &self.profile)
            .field("session", &self.session.as_ref().map(|_| "<session>"))
            .finish()
    }
}
