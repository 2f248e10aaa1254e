//! Shared fixtures for unit tests.

use std::sync::Arc;

use serde_json::json;

use crate::context::{AuthContext, JwtToken, StaticSession};
use crate::session::{Payload, Profile, Session};
use crate::slice::AuthSliceState;

/// Route `tracing` output through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn payload(key: &str, value: &str) -> Payload {
    let mut map = Payload::new();
    map.insert(key.to_owned(), json!(value));
    map
}

pub fn sample_profile() -> Profile {
    Profile {
        email: "testEmail@gmail.com".to_owned(),
        first_name: "Joe".to_owned(),
        last_name: "Schmo".to_owned(),
        allow_marketing: true,
        extra: serde_json::Map::new(),
    }
}

pub fn other_profile() -> Profile {
    Profile {
        email: "newEmail@gmail.com".to_owned(),
        first_name: "Joseph".to_owned(),
        last_name: "Schmoseph".to_owned(),
        allow_marketing: false,
        extra: serde_json::Map::new(),
    }
}

pub fn provider_session(suffix: &str) -> StaticSession {
    StaticSession {
        access: JwtToken::new(format!("accessJwtToken{suffix}"), payload("accessKey", &format!("accessValue{suffix}"))),
        id: JwtToken::new(format!("idJwtToken{suffix}"), payload("idKey", &format!("idValue{suffix}"))),
    }
}

pub fn completed_context() -> AuthContext {
    AuthContext::new(Arc::new(sample_profile()), Arc::new(provider_session("")))
}

pub fn sample_session() -> Session {
    Session {
        access_token: "accessJwtToken".to_owned(),
        access_payload: payload("accessKey", "accessValue"),
        id_token: "idJwtToken".to_owned(),
        id_payload: payload("idKey", "idValue"),
        profile: Arc::new(sample_profile()),
    }
}

/// Auth state extended with one caller-owned field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FooAuthState {
    pub session: Option<Arc<Session>>,
    pub foo: String,
}

impl AuthSliceState for FooAuthState {
    fn session(&self) -> Option<&Arc<Session>> {
        self.session.as_ref()
    }

    fn replace_session(&mut self, session: Option<Arc<Session>>) {
        self.session = session;
    }
}
