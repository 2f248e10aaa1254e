//! Derived read accessors over the auth slice.
//!
//! DESIGN
//! ======
//! `select_slice` is a plain lookup by slice name. `select_session` and
//! `select_profile` are memoized on the identity of their direct input, so
//! repeated reads of an unchanged store return the same `Arc`s without
//! recomputing.
//!
//! Each cache keeps its last input and output. The most recently selected
//! slice state and session stay alive until the selectors (and every clone)
//! are dropped, even after the store has moved on.

#[cfg(test)]
#[path = "selectors_test.rs"]
mod selectors_test;

use std::marker::PhantomData;
use std::sync::Arc;

use crate::memo::Memoized;
use crate::session::{Profile, Session};
use crate::slice::AuthSliceState;
use crate::store::RootState;

type SessionMemo<S> = Memoized<Option<Arc<S>>, Option<Arc<Session>>>;
type ProfileMemo = Memoized<Option<Arc<Session>>, Option<Arc<Profile>>>;

/// Selectors bound to one slice name. Cheap to clone; clones share caches.
pub struct AuthSelectors<S> {
    name: Arc<str>,
    session: Arc<SessionMemo<S>>,
    profile: Arc<ProfileMemo>,
    _state: PhantomData<fn() -> S>,
}

impl<S> Clone for AuthSelectors<S> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            session: Arc::clone(&self.session),
            profile: Arc::clone(&self.profile),
            _state: PhantomData,
        }
    }
}

impl<S: AuthSliceState> AuthSelectors<S> {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            session: Arc::new(Memoized::new(|slice: &Option<Arc<S>>| slice.as_ref().and_then(|s| s.session().cloned()))),
            profile: Arc::new(Memoized::new(|session: &Option<Arc<Session>>| {
                session.as_ref().map(|s| Arc::clone(&s.profile))
            })),
            _state: PhantomData,
        }
    }

    /// Slice name these selectors read.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whole slice state, or `None` when the root state lacks the slice.
    #[must_use]
    pub fn select_slice(&self, root: &RootState) -> Option<Arc<S>> {
        root.slice::<S>(&self.name)
    }

    /// Current session, or `None`.
    #[must_use]
    pub fn select_session(&self, root: &RootState) -> Option<Arc<Session>> {
        self.session.get(self.select_slice(root))
    }

    /// Profile of the current session, or `None` without a session.
    #[must_use]
    pub fn select_profile(&self, root: &RootState) -> Option<Arc<Profile>> {
        self.profile.get(self.select_session(root))
    }
}

impl<S> std::fmt::Debug for AuthSelectors<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSelectors").field("name", &self.name).finish_non_exhaustive()
    }
}
