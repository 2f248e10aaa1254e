//! Named auth slice: state shape, options, and case reducers.
//!
//! SYSTEM CONTEXT
//! ==============
//! A slice owns one state value inside the store. Its built-in `setSession`
//! case is the only code allowed to replace the session field; caller cases
//! registered through `SliceOptions` may change anything else.
//!
//! DESIGN
//! ======
//! Case reducers are keyed by full action type (`"{name}/{case}"` for the
//! slice's own cases, any string for `extra_reducer`). Each case works on a
//! clone of the current state, so a failing case never leaves a half-applied
//! state behind.

#[cfg(test)]
#[path = "slice_test.rs"]
mod slice_test;

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::StoreError;
use crate::session::Session;
use crate::store::{ActionCreator, AnyValue, PayloadAction, SliceReducer};

/// Slice name used when none is configured.
pub const DEFAULT_SLICE_NAME: &str = "auth";

/// Case name of the built-in session replacement.
pub const SET_SESSION_CASE: &str = "setSession";

// =============================================================================
// STATE
// =============================================================================

/// State types an auth slice can own.
///
/// Implement this on a custom struct to carry extra fields next to the
/// session.
pub trait AuthSliceState: Clone + Default + Send + Sync + 'static {
    fn session(&self) -> Option<&Arc<Session>>;
    fn replace_session(&mut self, session: Option<Arc<Session>>);
}

/// Default auth slice state: just the session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub session: Option<Arc<Session>>,
}

impl AuthSliceState for AuthState {
    fn session(&self) -> Option<&Arc<Session>> {
        self.session.as_ref()
    }

    fn replace_session(&mut self, session: Option<Arc<Session>>) {
        self.session = session;
    }
}

// =============================================================================
// OPTIONS
// =============================================================================

type CaseFn<S> = Arc<dyn Fn(&mut S, &PayloadAction) -> Result<(), StoreError> + Send + Sync>;

struct Case<S> {
    payload_type: TypeId,
    reducer: CaseFn<S>,
    owns_session: bool,
}

/// Configuration for [`crate::build_auth_slice`].
pub struct SliceOptions<S> {
    name: Option<String>,
    initial_state: Option<S>,
    reducers: Vec<(String, Case<S>)>,
    extra_reducers: Vec<(String, Case<S>)>,
}

impl<S> Default for SliceOptions<S> {
    fn default() -> Self {
        Self { name: None, initial_state: None, reducers: Vec::new(), extra_reducers: Vec::new() }
    }
}

impl<S: AuthSliceState> SliceOptions<S> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Slice name inside the store. Defaults to [`DEFAULT_SLICE_NAME`].
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Initial value for the extra fields. Its session is always cleared.
    #[must_use]
    pub fn initial_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Add a case reducer handling `"{name}/{case}"`.
    #[must_use]
    pub fn reducer<P, F>(self, case: impl Into<String>, reduce: F) -> Self
    where
        P: Any + Send + Sync,
        F: Fn(&mut S, &P) + Send + Sync + 'static,
    {
        self.try_reducer(case, move |state: &mut S, payload: &P| {
            reduce(state, payload);
            Ok::<(), std::convert::Infallible>(())
        })
    }

    /// Add a fallible case reducer handling `"{name}/{case}"`.
    ///
    /// An error from `reduce` aborts the dispatch and is returned from
    /// [`crate::Store::dispatch`] as [`StoreError::Reducer`].
    #[must_use]
    pub fn try_reducer<P, E, F>(mut self, case: impl Into<String>, reduce: F) -> Self
    where
        P: Any + Send + Sync,
        E: std::error::Error + Send + Sync + 'static,
        F: Fn(&mut S, &P) -> Result<(), E> + Send + Sync + 'static,
    {
        self.reducers.push((case.into(), caller_case(reduce)));
        self
    }

    /// React to an action type owned by another slice.
    #[must_use]
    pub fn extra_reducer<P, F>(mut self, kind: impl Into<String>, reduce: F) -> Self
    where
        P: Any + Send + Sync,
        F: Fn(&mut S, &P) + Send + Sync + 'static,
    {
        let case = caller_case(move |state: &mut S, payload: &P| {
            reduce(state, payload);
            Ok::<(), std::convert::Infallible>(())
        });
        self.extra_reducers.push((kind.into(), case));
        self
    }
}

fn caller_case<S, P, E, F>(reduce: F) -> Case<S>
where
    S: AuthSliceState,
    P: Any + Send + Sync,
    E: std::error::Error + Send + Sync + 'static,
    F: Fn(&mut S, &P) -> Result<(), E> + Send + Sync + 'static,
{
    let reducer: CaseFn<S> = Arc::new(move |state: &mut S, action: &PayloadAction| {
        let payload = action.expect_payload::<P>()?;
        reduce(state, payload)
            .map_err(|e| StoreError::Reducer { action: action.kind().to_owned(), source: Arc::new(e) })
    });
    Case { payload_type: TypeId::of::<P>(), reducer, owns_session: false }
}

fn set_session_case<S: AuthSliceState>() -> Case<S> {
    let reducer: CaseFn<S> = Arc::new(|state: &mut S, action: &PayloadAction| {
        let session = action.expect_payload::<Session>()?;
        state.replace_session(Some(Arc::new(session.clone())));
        Ok(())
    });
    Case { payload_type: TypeId::of::<Session>(), reducer, owns_session: true }
}

// =============================================================================
// SLICE
// =============================================================================

struct SliceInner<S> {
    name: String,
    initial: S,
    cases: BTreeMap<String, Case<S>>,
    set_session: ActionCreator<Session>,
}

/// A named auth slice. Cheap to clone.
pub struct Slice<S> {
    inner: Arc<SliceInner<S>>,
}

impl<S> Clone for Slice<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S: AuthSliceState> Slice<S> {
    pub(crate) fn from_options(options: SliceOptions<S>) -> Self {
        let name = options.name.unwrap_or_else(|| DEFAULT_SLICE_NAME.to_owned());
        let mut initial = options.initial_state.unwrap_or_default();
        initial.replace_session(None);

        let mut cases = BTreeMap::new();
        for (kind, case) in options.extra_reducers {
            cases.insert(kind, case);
        }
        for (case_name, case) in options.reducers {
            cases.insert(action_type(&name, &case_name), case);
        }
        let set_session_kind = action_type(&name, SET_SESSION_CASE);
        cases.insert(set_session_kind.clone(), set_session_case());

        Self { inner: Arc::new(SliceInner { name, initial, cases, set_session: ActionCreator::new(set_session_kind) }) }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// State the slice starts with in a new store.
    #[must_use]
    pub fn initial_state(&self) -> S {
        self.inner.initial.clone()
    }

    /// Action replacing the whole session.
    #[must_use]
    pub fn set_session(&self, session: Session) -> PayloadAction {
        self.inner.set_session.create(session)
    }

    /// Creator for the `setSession` action.
    #[must_use]
    pub fn set_session_action(&self) -> &ActionCreator<Session> {
        &self.inner.set_session
    }

    /// Creator for a caller-registered case, if `case` exists with payload `P`.
    #[must_use]
    pub fn action<P: Any + Send + Sync>(&self, case: &str) -> Option<ActionCreator<P>> {
        let kind = action_type(&self.inner.name, case);
        let registered = self.inner.cases.get(&kind)?;
        (registered.payload_type == TypeId::of::<P>()).then(|| ActionCreator::new(kind))
    }

    /// Full action types this slice handles.
    pub fn action_types(&self) -> impl Iterator<Item = &str> {
        self.inner.cases.keys().map(String::as_str)
    }

    /// Reduce a typed state. `Ok(None)` means the action is not handled here.
    ///
    /// # Errors
    ///
    /// Returns the case reducer's error, or [`StoreError::SessionMutated`]
    /// when a caller case replaced the session.
    pub fn reduce_state(&self, state: &S, action: &PayloadAction) -> Result<Option<S>, StoreError> {
        let Some(case) = self.inner.cases.get(action.kind()) else {
            return Ok(None);
        };

        let mut next = state.clone();
        (case.reducer)(&mut next, action)?;

        if !case.owns_session && !same_session(state.session(), next.session()) {
            tracing::warn!(slice = %self.inner.name, action = action.kind(), "caller reducer touched session");
            return Err(StoreError::SessionMutated { action: action.kind().to_owned() });
        }
        Ok(Some(next))
    }
}

impl<S: AuthSliceState> SliceReducer for Slice<S> {
    fn name(&self) -> &str {
        &self.inner.name
    }

    fn initial(&self) -> AnyValue {
        Arc::new(self.initial_state())
    }

    fn reduce(&self, current: &AnyValue, action: &PayloadAction) -> Result<Option<AnyValue>, StoreError> {
        let Some(state) = current.downcast_ref::<S>() else {
            return Ok(None);
        };
        Ok(self.reduce_state(state, action)?.map(|next| Arc::new(next) as AnyValue))
    }
}

impl<S> fmt::Debug for Slice<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slice")
            .field("name", &self.inner.name)
            .field("cases", &self.inner.cases.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// `"{slice}/{case}"`.
#[must_use]
pub fn action_type(slice: &str, case: &str) -> String {
    format!("{slice}/{case}")
}

fn same_session(a: Option<&Arc<Session>>, b: Option<&Arc<Session>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
