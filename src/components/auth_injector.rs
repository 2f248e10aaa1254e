//! Gate that publishes the auth context into the store and withholds its
//! children until a session is present.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted once near the root, inside the identity provider's sign-in flow.
//! Everything below it may assume `select_session` returns `Some`.

#[cfg(all(test, any(feature = "ssr", feature = "csr")))]
#[path = "auth_injector_test.rs"]
mod auth_injector_test;

use leptos::prelude::*;

use crate::context::AuthContext;
use crate::error::AuthSliceError;
use crate::store::{Store, use_store};
use crate::sync::SessionSync;

/// Renders `children` only once the store holds a session.
///
/// The context is synced from an effect, so the first render after a context
/// change still shows the previous store state. Sync failures are rendered as
/// errors for the nearest `ErrorBoundary`.
#[component]
pub fn AuthInjector(
    /// Coordinator from `AuthSliceUtils::session_sync`, one per instance.
    sync: SessionSync,
    /// Identity provider state.
    #[prop(into)]
    context: Signal<AuthContext>,
    /// Store to publish into; defaults to the one from `provide_store`.
    #[prop(optional)]
    store: Option<Store>,
    children: ChildrenFn,
) -> impl IntoView {
    let store = store.unwrap_or_else(use_store);
    let failure = RwSignal::new(None::<AuthSliceError>);

    let ready = {
        let store = store.clone();
        let sync = sync.clone();
        Signal::derive(move || store.with(|root| sync.has_session(root)))
    };

    let mut sync = sync;
    Effect::new(move || {
        let ctx = context.get();
        match sync.sync(&ctx, &store) {
            Ok(_) => {
                if failure.with_untracked(Option::is_some) {
                    failure.set(None);
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to publish auth context");
                failure.set(Some(err));
            }
        }
    });

    move || -> Result<Option<AnyView>, AuthSliceError> {
        if let Some(err) = failure.get() {
            return Err(err);
        }
        Ok(ready.get().then(|| children()))
    }
}
