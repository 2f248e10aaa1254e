//! # auth-slice
//!
//! Bridges an identity-provider session (Cognito-style access and id tokens
//! plus a user profile) into a reactive Leptos store, and gates protected
//! views until that session has landed.
//!
//! `build_auth_slice` returns the slice (reducer and `setSession` action),
//! identity-memoized selectors, and a `SessionSync` factory for the
//! [`AuthInjector`] component. The crate also carries the small slice-based
//! store the auth slice lives in.
//!
//! ```rust,ignore
//! let auth = build_auth_slice(SliceOptions::<AuthState>::new());
//! let store = Store::builder().slice(auth.slice.clone())?.build();
//! provide_store(store);
//!
//! view! {
//!     <AuthInjector sync=auth.session_sync() context=auth_context>
//!         <Dashboard/>
//!     </AuthInjector>
//! }
//! ```

pub mod builder;
pub mod components;
pub mod context;
pub mod error;
pub mod memo;
pub mod selectors;
pub mod session;
pub mod slice;
pub mod store;
pub mod sync;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use builder::{AuthSliceUtils, build_auth_slice};
pub use components::auth_injector::AuthInjector;
pub use components::session_info::SessionInfo;
pub use context::{AuthContext, JwtToken, ProviderSession, StaticSession};
pub use error::{AuthSliceError, StoreError};
pub use selectors::AuthSelectors;
pub use session::{Payload, Profile, Session};
pub use slice::{AuthSliceState, AuthState, DEFAULT_SLICE_NAME, Slice, SliceOptions};
pub use store::{ActionCreator, PayloadAction, RootState, Store, StoreBuilder, provide_store, use_store};
pub use sync::SessionSync;
