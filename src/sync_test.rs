use super::*;

use crate::builder::{AuthSliceUtils, build_auth_slice};
use crate::context::StaticSession;
use crate::error::StoreError;
use crate::slice::{AuthState, SliceOptions};
use crate::test_helpers::{completed_context, init_tracing, other_profile, provider_session, sample_session};

fn setup() -> (AuthSliceUtils<AuthState>, Store) {
    init_tracing();
    let utils = build_auth_slice(SliceOptions::<AuthState>::new().name("testAuth"));
    let store = Store::builder().slice(utils.slice.clone()).expect("slice").build();
    (utils, store)
}

fn stored_session(utils: &AuthSliceUtils<AuthState>, store: &Store) -> Arc<Session> {
    utils.selectors.select_session(&store.state()).expect("session in store")
}

// =============================================================
// derive_session
// =============================================================

#[test]
fn derive_session_copies_tokens_and_shares_profile() {
    let profile = Arc::new(crate::test_helpers::sample_profile());
    let session = derive_session(&provider_session(""), Arc::clone(&profile));
    assert_eq!(session, sample_session());
    assert!(Arc::ptr_eq(&session.profile, &profile));
}

// =============================================================
// plan
// =============================================================

#[test]
fn plan_rejects_context_without_session() {
    let (utils, _) = setup();
    let ctx = AuthContext { profile: Some(Arc::new(other_profile())), session: None };
    let err = utils.session_sync().plan(&ctx).expect_err("missing session");
    assert!(matches!(err, AuthSliceError::MissingSession));
}

#[test]
fn plan_rejects_context_without_profile() {
    let (utils, _) = setup();
    let ctx = AuthContext { profile: None, session: Some(Arc::new(StaticSession::default())) };
    let err = utils.session_sync().plan(&ctx).expect_err("missing profile");
    assert!(matches!(err, AuthSliceError::MissingProfile));
}

#[test]
fn plan_does_not_touch_the_store() {
    let (utils, store) = setup();
    let planned = utils.session_sync().plan(&completed_context()).expect("plan");
    assert_eq!(planned, Some(sample_session()));
    assert!(utils.selectors.select_session(&store.state()).is_none());
}

// =============================================================
// sync
// =============================================================

#[test]
fn sync_adds_profile_and_session_to_store() {
    let (utils, store) = setup();
    let mut sync = utils.session_sync();
    assert!(!sync.has_session(&store.state()));

    assert!(sync.sync(&completed_context(), &store).expect("sync"));

    assert!(sync.has_session(&store.state()));
    assert_eq!(*stored_session(&utils, &store), sample_session());
}

#[test]
fn sync_skips_publish_for_same_references() {
    let (utils, store) = setup();
    let mut sync = utils.session_sync();
    let ctx = completed_context();

    assert!(sync.sync(&ctx, &store).expect("first sync"));
    let first = stored_session(&utils, &store);
    assert!(!sync.sync(&ctx.clone(), &store).expect("second sync"));
    assert!(Arc::ptr_eq(&first, &stored_session(&utils, &store)));
}

#[test]
fn sync_republishes_when_references_change() {
    let (utils, store) = setup();
    let mut sync = utils.session_sync();
    sync.sync(&completed_context(), &store).expect("first sync");

    let new_ctx = AuthContext::new(Arc::new(other_profile()), Arc::new(provider_session("2")));
    assert!(sync.sync(&new_ctx, &store).expect("second sync"));

    let session = stored_session(&utils, &store);
    assert_eq!(session.access_token, "accessJwtToken2");
    assert_eq!(session.id_token, "idJwtToken2");
    assert_eq!(session.access_payload.get("accessKey"), Some(&serde_json::json!("accessValue2")));
    assert_eq!(session.id_payload.get("idKey"), Some(&serde_json::json!("idValue2")));
    assert_eq!(*session.profile, other_profile());
}

#[test]
fn sync_republishes_when_only_profile_changes() {
    let (utils, store) = setup();
    let mut sync = utils.session_sync();
    let ctx = completed_context();
    sync.sync(&ctx, &store).expect("first sync");

    let new_ctx = AuthContext { profile: Some(Arc::new(other_profile())), ..ctx };
    assert!(sync.sync(&new_ctx, &store).expect("second sync"));
    let session = stored_session(&utils, &store);
    assert_eq!(session.access_token, "accessJwtToken");
    assert_eq!(session.profile.email, "newEmail@gmail.com");
}

#[test]
fn sync_error_leaves_store_and_allows_retry() {
    let (utils, store) = setup();
    let mut sync = utils.session_sync();
    let err = sync.sync(&AuthContext::default(), &store).expect_err("empty context");
    assert!(matches!(err, AuthSliceError::MissingSession));
    assert!(!sync.has_session(&store.state()));

    assert!(sync.sync(&completed_context(), &store).expect("retry"));
}

#[test]
fn sync_for_unregistered_slice_is_invisible() {
    let (utils, store) = setup();
    let stray = build_auth_slice(SliceOptions::<AuthState>::new().name("elsewhere"));
    let mut sync = stray.session_sync();
    assert!(sync.sync(&completed_context(), &store).expect("dispatch is accepted"));
    assert!(!sync.has_session(&store.state()));
    assert!(!utils.session_sync().has_session(&store.state()));
}

#[test]
fn store_errors_convert_into_auth_slice_errors() {
    let err: AuthSliceError = StoreError::DuplicateSlice { name: "auth".to_owned() }.into();
    assert!(matches!(err, AuthSliceError::Store(StoreError::DuplicateSlice { .. })));
    assert_eq!(err.to_string(), "slice `auth` is already registered on this store");
}

#[test]
fn independent_syncs_track_their_own_inputs() {
    let (utils, store) = setup();
    let ctx = completed_context();
    let mut a = utils.session_sync();
    let mut b = utils.session_sync();
    assert!(a.sync(&ctx, &store).expect("a"));
    assert!(b.sync(&ctx, &store).expect("b"));
    assert!(!a.sync(&ctx, &store).expect("a again"));
}
