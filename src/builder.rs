//! `build_auth_slice`: slice, selectors, and injector wiring in one call.

#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;

use crate::selectors::AuthSelectors;
use crate::slice::{AuthSliceState, AuthState, Slice, SliceOptions};
use crate::sync::SessionSync;

/// Everything produced by [`build_auth_slice`].
#[derive(Clone, Debug)]
pub struct AuthSliceUtils<S = AuthState> {
    pub slice: Slice<S>,
    pub selectors: AuthSelectors<S>,
}

impl<S: AuthSliceState> AuthSliceUtils<S> {
    /// Fresh coordinator for one `AuthInjector` instance.
    #[must_use]
    pub fn session_sync(&self) -> SessionSync {
        let selectors = self.selectors.clone();
        SessionSync::new(self.slice.set_session_action().clone(), move |root| selectors.select_session(root))
    }
}

/// Build an auth slice, its selectors, and the injector coordinator factory.
///
/// No store is created; register `utils.slice` with [`crate::Store::builder`].
#[must_use]
pub fn build_auth_slice<S: AuthSliceState>(options: SliceOptions<S>) -> AuthSliceUtils<S> {
    let slice = Slice::from_options(options);
    let selectors = AuthSelectors::new(slice.name());
    tracing::debug!(slice = slice.name(), "auth slice built");
    AuthSliceUtils { slice, selectors }
}
