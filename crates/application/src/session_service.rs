//! Process-wide current session and the flow that replaces it.

use std::sync::Arc;

use async_trait::async_trait;
use eca_core::{AppResult, SessionTokens, UserSession};
use tokio::sync::watch;

/// Port for retrieving the signed-in user's profile.
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Fetches the current user for the given tokens.
    async fn fetch_current_session(&self, tokens: &SessionTokens) -> AppResult<UserSession>;
}

/// Shared holder of the current session.
///
/// Replacement is atomic: readers and subscribers see either the previous or
/// the new session, never a mix.
#[derive(Clone)]
pub struct SessionStore {
    sender: Arc<watch::Sender<Option<Arc<UserSession>>>>,
}

impl SessionStore {
    /// Creates a store with no session loaded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sender: Arc::new(watch::Sender::new(None)),
        }
    }

    /// Returns a snapshot of the current session.
    #[must_use]
    pub fn current(&self) -> Option<Arc<UserSession>> {
        self.sender.borrow().clone()
    }

    /// Replaces the current session wholesale.
    pub fn replace(&self, session: UserSession) -> Arc<UserSession> {
        let session = Arc::new(session);
        self.sender.send_replace(Some(session.clone()));
        session
    }

    /// Drops the current session.
    pub fn clear(&self) {
        self.sender.send_replace(None);
    }

    /// Subscribes to session replacements.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<UserSession>>> {
        self.sender.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Application service for session retrieval, re-authentication and logout.
#[derive(Clone)]
pub struct SessionService {
    source: Arc<dyn SessionSource>,
    store: SessionStore,
}

impl SessionService {
    /// Creates a session service.
    #[must_use]
    pub fn new(source: Arc<dyn SessionSource>, store: SessionStore) -> Self {
        Self { source, store }
    }

    /// Loads the session for `tokens` and makes it current.
    ///
    /// On failure the previous session, if any, stays current.
    pub async fn sign_in(&self, tokens: SessionTokens) -> AppResult<Arc<UserSession>> {
        let session = self.source.fetch_current_session(&tokens).await?;
        Ok(self.store.replace(session))
    }

    /// Clears the current session.
    pub fn sign_out(&self) {
        self.store.clear();
    }

    /// Returns the store backing this service.
    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}
