//! Two-phase bridge from the external auth context into the store.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionSync` backs one mounted `AuthInjector`. The component calls
//! `sync` from an effect, after the render that observed the context.
//!
//! DESIGN
//! ======
//! 1. `plan` derives a `Session` from the context. It is pure and returns
//!    `None` when the context's session and profile are the same references
//!    that were last published.
//! 2. `sync` publishes the planned session through `setSession` and only then
//!    records the input identity, so a failed publish is retried next time.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use std::fmt;
use std::sync::Arc;

use crate::context::{AuthContext, ProviderSession};
use crate::error::AuthSliceError;
use crate::memo::SameRef;
use crate::session::{Profile, Session};
use crate::store::{ActionCreator, RootState, Store};

type SessionReader = Arc<dyn Fn(&RootState) -> Option<Arc<Session>> + Send + Sync>;

/// Per-instance coordinator between an [`AuthContext`] and a [`Store`].
#[derive(Clone)]
pub struct SessionSync {
    set_session: ActionCreator<Session>,
    read_session: SessionReader,
    published: Option<(Arc<dyn ProviderSession>, Arc<Profile>)>,
}

impl SessionSync {
    pub(crate) fn new(
        set_session: ActionCreator<Session>,
        read_session: impl Fn(&RootState) -> Option<Arc<Session>> + Send + Sync + 'static,
    ) -> Self {
        Self { set_session, read_session: Arc::new(read_session), published: None }
    }

    /// Derive the session to publish for `ctx`.
    ///
    /// Returns `Ok(None)` when `ctx` carries the references published last.
    ///
    /// # Errors
    ///
    /// [`AuthSliceError::MissingSession`] or [`AuthSliceError::MissingProfile`]
    /// when the context is incomplete.
    pub fn plan(&self, ctx: &AuthContext) -> Result<Option<Session>, AuthSliceError> {
        let (session, profile) = context_inputs(ctx)?;
        if let Some(published) = &self.published {
            if published.same_ref(&(Arc::clone(&session), Arc::clone(&profile))) {
                return Ok(None);
            }
        }
        Ok(Some(derive_session(session.as_ref(), profile)))
    }

    /// Plan and publish. Returns `true` when a `setSession` was dispatched.
    ///
    /// # Errors
    ///
    /// Context errors from [`Self::plan`] and store errors from dispatch.
    pub fn sync(&mut self, ctx: &AuthContext, store: &Store) -> Result<bool, AuthSliceError> {
        let Some(session) = self.plan(ctx)? else {
            tracing::trace!(action = self.set_session.kind(), "auth context unchanged; skipping publish");
            return Ok(false);
        };

        store.dispatch(&self.set_session.create(session))?;
        self.published = Some(context_inputs(ctx)?);
        tracing::debug!(action = self.set_session.kind(), "session published");
        Ok(true)
    }

    /// True once the store holds a session for this slice.
    #[must_use]
    pub fn has_session(&self, root: &RootState) -> bool {
        (self.read_session)(root).is_some()
    }

    /// Tracked read of the store's session for this slice.
    #[must_use]
    pub fn session(&self, store: &Store) -> Option<Arc<Session>> {
        store.with(|root| (self.read_session)(root))
    }
}

impl fmt::Debug for SessionSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSync")
            .field("action", &self.set_session.kind())
            .field("published", &self.published.is_some())
            .finish()
    }
}

fn context_inputs(ctx: &AuthContext) -> Result<(Arc<dyn ProviderSession>, Arc<Profile>), AuthSliceError> {
    let session = ctx.session.clone().ok_or(AuthSliceError::MissingSession)?;
    let profile = ctx.profile.clone().ok_or(AuthSliceError::MissingProfile)?;
    Ok((session, profile))
}

/// Build a [`Session`] from provider tokens and a profile.
#[must_use]
pub fn derive_session(session: &dyn ProviderSession, profile: Arc<Profile>) -> Session {
    let access = session.access_token();
    let id = session.id_token();
    Session {
        access_token: access.jwt_token().to_owned(),
        access_payload: access.payload().clone(),
        id_token: id.jwt_token().to_owned(),
        id_payload: id.payload().clone(),
        profile,
    }
}
