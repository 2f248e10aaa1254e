use super::*;

use serde_json::json;

fn payload(key: &str, value: &str) -> Payload {
    let mut map = Payload::new();
    map.insert(key.to_owned(), json!(value));
    map
}

#[test]
fn jwt_token_exposes_raw_token_and_claims() {
    let token = JwtToken::new("accessJwtToken", payload("accessKey", "accessValue"));
    assert_eq!(token.jwt_token(), "accessJwtToken");
    assert_eq!(token.payload().get("accessKey"), Some(&json!("accessValue")));
}

#[test]
fn static_session_returns_its_tokens() {
    let session = StaticSession {
        access: JwtToken::new("a", payload("k", "a")),
        id: JwtToken::new("i", payload("k", "i")),
    };
    assert_eq!(session.access_token().jwt_token(), "a");
    assert_eq!(session.id_token().jwt_token(), "i");
}

#[test]
fn default_context_is_signed_out() {
    assert!(!AuthContext::default().is_signed_in());
}

#[test]
fn context_with_profile_and_session_is_signed_in() {
    let ctx = AuthContext::new(Arc::new(Profile::default()), Arc::new(StaticSession::default()));
    assert!(ctx.is_signed_in());
}

#[test]
fn context_debug_hides_session_internals() {
    let ctx = AuthContext::new(Arc::new(Profile::default()), Arc::new(StaticSession::default()));
    let rendered = format!("{ctx:?}");
    assert!(rendered.contains("<session>"));
}
