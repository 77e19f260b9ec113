use std::sync::Arc;

use tokio::sync::watch;

use crate::auth::models::{TokenPair, User};
use crate::auth::session::SessionStore;
use crate::error::StorageError;

/// Single owner of the in-memory "current user".
///
/// Every mutation goes through this type so the stored session and the value
/// observed by subscribers never disagree. Subscribers get a
/// [`watch::Receiver`] and are woken on every change.
#[derive(Clone)]
pub struct AuthController {
    store: SessionStore,
    current: Arc<watch::Sender<Option<User>>>,
}

impl AuthController {
    /// Build a controller with no user loaded yet.
    pub fn new(store: SessionStore) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            store,
            current: Arc::new(tx),
        }
    }

    /// Build a controller and hydrate it from storage.
    pub fn load(store: SessionStore) -> Result<Self, StorageError> {
        let controller = Self::new(store);
        controller.reload()?;
        Ok(controller)
    }

    /// Reconcile with storage. A stored user without an access token is a
    /// half-written session and gets cleared.
    pub fn reload(&self) -> Result<(), StorageError> {
        let user = self.store.load_user()?;
        let token = self.store.access_token()?;

        let user = match (user, token) {
            (Some(user), Some(_)) => Some(user),
            (Some(_), None) => {
                tracing::warn!("Stored user has no access token, clearing session");
                self.store.clear()?;
                None
            }
            (None, _) => None,
        };

        self.current.send_replace(user);
        Ok(())
    }

    pub fn session(&self) -> &SessionStore {
        &self.store
    }

    pub fn current_user(&self) -> Option<User> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.current.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current
            .borrow()
            .as_ref()
            .map(User::is_admin)
            .unwrap_or(false)
    }

    /// Replace the current user wholesale. The session must already hold an
    /// access token.
    pub fn set_user(&self, user: User) -> Result<(), StorageError> {
        self.store.store_user(&user)?;
        self.current.send_replace(Some(user));
        Ok(())
    }

    /// Commit a fresh session: tokens and user land in storage together,
    /// then the in-memory value is replaced.
    pub fn login(&self, tokens: &TokenPair, user: User) -> Result<(), StorageError> {
        self.store.commit(tokens, &user)?;
        self.current.send_replace(Some(user));
        Ok(())
    }

    pub fn logout(&self) -> Result<(), StorageError> {
        self.store.clear()?;
        self.current.send_replace(None);
        Ok(())
    }
}
