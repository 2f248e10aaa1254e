//! Error types for the store and the auth bridge.
//!
//! DESIGN
//! ======
//! Nothing here is recovered locally. Store errors surface from `dispatch` and
//! `StoreBuilder::slice`; bridge errors surface from `SessionSync` and are
//! rendered by `AuthInjector` so the nearest `ErrorBoundary` picks them up.

use std::sync::Arc;

/// Failure raised by the state container.
#[derive(Clone, Debug, thiserror::Error)]
pub enum StoreError {
    /// Two slices with the same name were registered on one store.
    #[error("slice `{name}` is already registered on this store")]
    DuplicateSlice { name: String },
    /// The action's payload is not the type its case reducer expects.
    #[error("action `{action}` carries a payload that is not `{expected}`")]
    PayloadType { action: String, expected: &'static str },
    /// A caller-supplied reducer replaced the session field.
    #[error("reducer for `{action}` modified the session field")]
    SessionMutated { action: String },
    /// A caller-supplied reducer failed.
    #[error("reducer for `{action}` failed: {source}")]
    Reducer {
        action: String,
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
}

/// Failure raised while bridging the external auth context into the store.
#[derive(Clone, Debug, thiserror::Error)]
pub enum AuthSliceError {
    /// The auth context has no identity-provider session.
    #[error("auth context has no session")]
    MissingSession,
    /// The auth context has no profile.
    #[error("auth context has no profile")]
    MissingProfile,
    #[error(transparent)]
    Store(#[from] StoreError),
}
