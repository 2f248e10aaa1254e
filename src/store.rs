//! Minimal reactive state container for named slices.
//!
//! DESIGN
//! ======
//! Action -> slice reducers -> new root state -> signal notification.
//!
//! The root state maps slice names to type-erased, `Arc`-shared slice states.
//! A slice that does not handle an action keeps its `Arc`, so identity-keyed
//! selectors downstream only recompute for slices that actually changed.
//! Dispatch builds the next root state off to the side and commits it in one
//! `set`; a failing reducer leaves the store untouched.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::any::{Any, type_name};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use leptos::prelude::*;

use crate::error::StoreError;

/// Type-erased, shareable value (slice state or action payload).
pub type AnyValue = Arc<dyn Any + Send + Sync>;

// =============================================================================
// ACTIONS
// =============================================================================

/// An action type string plus an opaque payload.
#[derive(Clone)]
pub struct PayloadAction {
    kind: String,
    payload: AnyValue,
}

impl PayloadAction {
    pub fn new<P: Any + Send + Sync>(kind: impl Into<String>, payload: P) -> Self {
        Self { kind: kind.into(), payload: Arc::new(payload) }
    }

    /// Full action type, e.g. `"auth/setSession"`.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Borrow the payload as `P`, if that is its type.
    #[must_use]
    pub fn payload<P: Any>(&self) -> Option<&P> {
        self.payload.downcast_ref::<P>()
    }

    /// Borrow the payload as `P`, or fail with [`StoreError::PayloadType`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PayloadType`] when the payload has another type.
    pub fn expect_payload<P: Any>(&self) -> Result<&P, StoreError> {
        self.payload::<P>()
            .ok_or_else(|| StoreError::PayloadType { action: self.kind.clone(), expected: type_name::<P>() })
    }
}

impl fmt::Debug for PayloadAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadAction").field("kind", &self.kind).finish_non_exhaustive()
    }
}

/// Typed factory for one action type.
pub struct ActionCreator<P> {
    kind: String,
    _payload: PhantomData<fn(P)>,
}

impl<P: Any + Send + Sync> ActionCreator<P> {
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into(), _payload: PhantomData }
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Build an action carrying `payload`.
    pub fn create(&self, payload: P) -> PayloadAction {
        PayloadAction::new(self.kind.clone(), payload)
    }

    /// True when `action` was made by this creator's type.
    #[must_use]
    pub fn matches(&self, action: &PayloadAction) -> bool {
        action.kind() == self.kind
    }
}

impl<P> Clone for ActionCreator<P> {
    fn clone(&self) -> Self {
        Self { kind: self.kind.clone(), _payload: PhantomData }
    }
}

impl<P> fmt::Debug for ActionCreator<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActionCreator").field(&self.kind).finish()
    }
}

// =============================================================================
// ROOT STATE
// =============================================================================

/// Whole-store state: one entry per registered slice, keyed by slice name.
#[derive(Clone, Default)]
pub struct RootState {
    slices: BTreeMap<String, AnyValue>,
}

impl RootState {
    /// Shared handle to the state of slice `name`, if present and of type `S`.
    #[must_use]
    pub fn slice<S: Any + Send + Sync>(&self, name: &str) -> Option<Arc<S>> {
        self.slices.get(name).cloned()?.downcast::<S>().ok()
    }

    /// Insert or replace the state of slice `name`.
    pub fn insert<S: Any + Send + Sync>(&mut self, name: impl Into<String>, state: S) {
        self.slices.insert(name.into(), Arc::new(state));
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.slices.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slices.keys().map(String::as_str)
    }
}

impl fmt::Debug for RootState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootState").field("slices", &self.slices.keys().collect::<Vec<_>>()).finish()
    }
}

// =============================================================================
// SLICE REDUCER SEAM
// =============================================================================

/// What the store needs from a slice, independent of its state type.
pub trait SliceReducer: Send + Sync {
    fn name(&self) -> &str;

    /// Fresh initial state for a newly built store.
    fn initial(&self) -> AnyValue;

    /// Reduce `current` under `action`.
    ///
    /// Returns `Ok(None)` when the slice does not handle the action, so the
    /// current state keeps its identity.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when a case reducer fails.
    fn reduce(&self, current: &AnyValue, action: &PayloadAction) -> Result<Option<AnyValue>, StoreError>;
}

// =============================================================================
// STORE
// =============================================================================

/// Cloneable handle to a reactive store.
#[derive(Clone)]
pub struct Store {
    root: ArcRwSignal<RootState>,
    reducers: Arc<[Arc<dyn SliceReducer>]>,
}

impl Store {
    #[must_use]
    pub fn builder() -> StoreBuilder {
        StoreBuilder::default()
    }

    /// Apply `action` to every slice and commit the result.
    ///
    /// # Errors
    ///
    /// Propagates the first reducer error; the store is unchanged in that case.
    pub fn dispatch(&self, action: &PayloadAction) -> Result<(), StoreError> {
        let mut next = self.root.get_untracked();
        let mut changed = Vec::new();
        for reducer in self.reducers.iter() {
            let Some(current) = next.slices.get(reducer.name()) else {
                continue;
            };
            if let Some(state) = reducer.reduce(current, action)? {
                next.slices.insert(reducer.name().to_owned(), state);
                changed.push(reducer.name());
            }
        }

        if changed.is_empty() {
            tracing::trace!(action = action.kind(), "action not handled by any slice");
            return Ok(());
        }
        tracing::debug!(action = action.kind(), slices = ?changed, "dispatched");
        self.root.set(next);
        Ok(())
    }

    /// Untracked snapshot of the root state.
    #[must_use]
    pub fn state(&self) -> RootState {
        self.root.get_untracked()
    }

    /// Tracked read of the root state.
    pub fn with<T>(&self, f: impl FnOnce(&RootState) -> T) -> T {
        self.root.with(f)
    }

    /// Tracked read through a selector.
    pub fn select<T>(&self, selector: impl FnOnce(&RootState) -> T) -> T {
        self.with(selector)
    }

    /// Names of the registered slices, in registration order.
    pub fn slice_names(&self) -> impl Iterator<Item = &str> {
        self.reducers.iter().map(|r| r.name())
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store").field("slices", &self.slice_names().collect::<Vec<_>>()).finish()
    }
}

/// Collects slices, then seeds the root state from their initial states.
#[derive(Default)]
pub struct StoreBuilder {
    reducers: Vec<Arc<dyn SliceReducer>>,
}

impl StoreBuilder {
    /// Register a slice.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateSlice`] when the name is already taken.
    pub fn slice(mut self, slice: impl SliceReducer + 'static) -> Result<Self, StoreError> {
        if self.reducers.iter().any(|r| r.name() == slice.name()) {
            return Err(StoreError::DuplicateSlice { name: slice.name().to_owned() });
        }
        self.reducers.push(Arc::new(slice));
        Ok(self)
    }

    #[must_use]
    pub fn build(self) -> Store {
        let slices = self.reducers.iter().map(|r| (r.name().to_owned(), r.initial())).collect();
        tracing::debug!(slices = self.reducers.len(), "store built");
        Store { root: ArcRwSignal::new(RootState { slices }), reducers: self.reducers.into() }
    }
}

impl fmt::Debug for StoreBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreBuilder")
            .field("slices", &self.reducers.iter().map(|r| r.name()).collect::<Vec<_>>())
            .finish()
    }
}

// =============================================================================
// CONTEXT
// =============================================================================

/// Make `store` available to descendant components.
pub fn provide_store(store: Store) {
    provide_context(store);
}

/// The store provided by an ancestor.
///
/// # Panics
///
/// Panics when no ancestor called [`provide_store`].
pub fn use_store() -> Store {
    expect_context::<Store>()
}
