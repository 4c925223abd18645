//! Session state and operations. `SessionContext` is the one shared,
//! constructor-injected holder of the bearer credential and cached identity;
//! `Session` layers the auth operations on top of it. A non-empty credential
//! means "logged in" whether or not the identity has been resolved yet.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api;
use crate::error::Error;
use crate::singleflight::Singleflight;
use crate::token::TokenStore;
use crate::transport::Transport;

/// The resolved user profile associated with a credential. Replaced
/// atomically by a full `me` response, never partially populated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub real_name: Option<String>,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

impl Identity {
    #[must_use]
    pub fn has_permission(&self, name: &str) -> bool {
        self.permissions.iter().any(|permission| permission == name)
    }
}

/// Point-in-time view of the session consumed by the navigation guard.
#[derive(Clone, Debug)]
pub struct SessionSnapshot {
    pub logged_in: bool,
    pub identity: Option<Identity>,
}

impl SessionSnapshot {
    /// An absent identity grants no permissions; this is never an error.
    #[must_use]
    pub fn has_permission(&self, name: &str) -> bool {
        self.identity
            .as_ref()
            .is_some_and(|identity| identity.has_permission(name))
    }
}

#[derive(Default)]
struct State {
    token: Option<SecretString>,
    identity: Option<Identity>,
}

struct ContextInner {
    store: TokenStore,
    state: RwLock<State>,
}

/// Shared credential/identity state, read once from the token store at
/// construction. Cloning shares the same state.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<ContextInner>,
}

impl SessionContext {
    #[must_use]
    pub fn new(store: TokenStore) -> Self {
        let token = store.load().map(SecretString::from);
        Self {
            inner: Arc::new(ContextInner {
                store,
                state: RwLock::new(State {
                    token,
                    identity: None,
                }),
            }),
        }
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.read().token.is_some()
    }

    /// The current bearer credential, if any.
    #[must_use]
    pub fn credential(&self) -> Option<SecretString> {
        self.read().token.clone()
    }

    /// Stores a new credential in memory and in the durable store. A failed
    /// persist is logged and does not fail the in-memory update.
    pub fn set_credential(&self, token: &str) {
        if let Err(err) = self.inner.store.save(token) {
            warn!("failed to persist credential: {err}");
        }
        self.write().token = Some(SecretString::from(token.to_string()));
    }

    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.read().identity.clone()
    }

    pub fn set_identity(&self, identity: Identity) {
        self.write().identity = Some(identity);
    }

    pub fn clear_identity(&self) {
        self.write().identity = None;
    }

    /// Clears credential and identity together, in memory and on disk.
    pub fn clear(&self) {
        if let Err(err) = self.inner.store.clear() {
            warn!("failed to remove persisted credential: {err}");
        }
        let mut state = self.write();
        state.token = None;
        state.identity = None;
    }

    #[must_use]
    pub fn has_permission(&self, name: &str) -> bool {
        self.read()
            .identity
            .as_ref()
            .is_some_and(|identity| identity.has_permission(name))
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.read();
        SessionSnapshot {
            logged_in: state.token.is_some(),
            identity: state.identity.clone(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.inner
            .state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.inner
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("SessionContext")
            .field("token", &state.token.as_ref().map(|_| "***"))
            .field("identity", &state.identity)
            .finish()
    }
}

struct SessionInner {
    context: SessionContext,
    transport: Transport,
    inflight: Singleflight<Result<Identity, Error>>,
}

/// Auth operations over a [`SessionContext`]. Cloning shares the same
/// session, including the in-flight identity resolution slot.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    #[must_use]
    pub fn new(context: SessionContext, transport: Transport) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                context,
                transport,
                inflight: Singleflight::new(),
            }),
        }
    }

    #[must_use]
    pub fn context(&self) -> &SessionContext {
        &self.inner.context
    }

    /// Authenticates and resolves the identity. The credential is persisted
    /// as soon as the backend grants it, so a failed identity resolution
    /// leaves a "logged in, no identity" state the guard later repairs.
    ///
    /// # Errors
    /// Surfaces the envelope message when the backend rejects the
    /// credentials, and propagates transport and identity-resolution
    /// failures.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), Error> {
        let grant = api::auth::login(&self.inner.transport, username, password)
            .await?
            .into_data()?;
        self.inner.context.set_credential(&grant.token);
        debug!("login accepted for {username}");
        self.ensure_identity().await?;
        Ok(())
    }

    /// Registers a new account. On success the previous cached identity is
    /// discarded before the new one is resolved; on failure the previous
    /// session is left untouched.
    ///
    /// # Errors
    /// Same contract as [`Session::login`].
    pub async fn register(&self, request: &api::auth::RegisterRequest) -> Result<(), Error> {
        let grant = api::auth::register(&self.inner.transport, request)
            .await?
            .into_data()?;
        self.inner.context.set_credential(&grant.token);
        self.inner.context.clear_identity();
        debug!("registration accepted for {}", request.username);
        self.ensure_identity().await?;
        Ok(())
    }

    /// Returns the cached identity, resolving it first if necessary.
    /// Concurrent callers coalesce onto a single underlying fetch and all
    /// observe the same outcome.
    ///
    /// # Errors
    /// Returns [`Error::Unauthorized`] without a credential, and the shared
    /// fetch outcome otherwise.
    pub async fn ensure_identity(&self) -> Result<Identity, Error> {
        if let Some(identity) = self.inner.context.identity() {
            return Ok(identity);
        }
        if !self.inner.context.is_logged_in() {
            return Err(Error::Unauthorized);
        }

        let session = self.clone();
        let outcome = self
            .inner
            .inflight
            .run(async move { session.fetch_identity().await })
            .await;
        outcome.unwrap_or_else(|| {
            Err(Error::Network(
                "identity fetch aborted before completing".to_string(),
            ))
        })
    }

    async fn fetch_identity(&self) -> Result<Identity, Error> {
        if let Some(identity) = self.inner.context.identity() {
            return Ok(identity);
        }
        let identity = api::auth::me(&self.inner.transport).await?.into_data()?;
        self.inner.context.set_identity(identity.clone());
        Ok(identity)
    }

    /// Clears credential and identity. Synchronous, no network call.
    pub fn logout(&self) {
        self.inner.context.clear();
        debug!("session cleared");
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.inner.context.is_logged_in()
    }

    #[must_use]
    pub fn has_permission(&self, name: &str) -> bool {
        self.inner.context.has_permission(name)
    }

    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.inner.context.identity()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.context.snapshot()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("context", &self.inner.context)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(permissions: &[&str]) -> Identity {
        Identity {
            id: 1,
            username: "admin".to_string(),
            real_name: None,
            roles: vec!["ADMIN".to_string()],
            permissions: permissions.iter().map(|p| (*p).to_string()).collect(),
        }
    }

    fn scratch_context(name: &str) -> SessionContext {
        let path = std::env::temp_dir().join(format!(
            "dormitory-console-session-{}-{name}",
            std::process::id()
        ));
        SessionContext::new(TokenStore::new(path))
    }

    #[test]
    fn context_starts_logged_out_without_persisted_token() {
        let context = scratch_context("fresh");
        assert!(!context.is_logged_in());
        assert!(context.identity().is_none());
    }

    #[test]
    fn clear_resets_credential_and_identity() {
        let context = scratch_context("clear");
        context.set_credential("T");
        context.set_identity(identity(&["student:read"]));
        assert!(context.is_logged_in());
        assert!(context.has_permission("student:read"));

        context.clear();
        assert!(!context.is_logged_in());
        assert!(!context.has_permission("student:read"));
        assert!(context.identity().is_none());
    }

    #[test]
    fn permissions_require_a_cached_identity() {
        let context = scratch_context("perm");
        context.set_credential("T");
        assert!(!context.has_permission("student:read"));

        context.set_identity(identity(&["dorm:building:read"]));
        assert!(context.has_permission("dorm:building:read"));
        assert!(!context.has_permission("student:read"));
    }

    #[test]
    fn debug_output_redacts_the_credential() {
        let context = scratch_context("debug");
        context.set_credential("very-secret-token");
        let rendered = format!("{context:?}");
        assert!(!rendered.contains("very-secret-token"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn snapshot_reflects_state_at_capture_time() {
        let context = scratch_context("snapshot");
        context.set_credential("T");
        let before = context.snapshot();
        context.set_identity(identity(&["repair:order:read"]));
        let after = context.snapshot();

        assert!(before.logged_in && before.identity.is_none());
        assert!(after.has_permission("repair:order:read"));
        assert!(!before.has_permission("repair:order:read"));
    }
}
