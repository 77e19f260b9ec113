use crate::auth::models::{TokenPair, User};
use crate::db::{ClearScope, LocalStorage};
use crate::error::StorageError;

pub const ACCESS_KEY: &str = "access";
pub const REFRESH_KEY: &str = "refresh";
pub const USER_KEY: &str = "user";
pub const ROLE_KEY: &str = "userRole";

/// Every key owned by the session. Logout and (by default) login clear
/// exactly these.
pub const SESSION_KEYS: [&str; 4] = [ACCESS_KEY, REFRESH_KEY, USER_KEY, ROLE_KEY];

/// Session credentials and the denormalised user record, persisted in local
/// storage under fixed keys.
#[derive(Clone)]
pub struct SessionStore {
    storage: LocalStorage,
    clear_all_on_login: bool,
}

impl SessionStore {
    pub fn new(storage: LocalStorage, clear_all_on_login: bool) -> Self {
        Self {
            storage,
            clear_all_on_login,
        }
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    /// Replace the stored session with `tokens` + `user` in a single
    /// transaction. Previous session keys (or every key, when configured)
    /// are removed first.
    pub fn commit(&self, tokens: &TokenPair, user: &User) -> Result<(), StorageError> {
        if tokens.access.is_empty() {
            return Err(StorageError::MissingAccessToken);
        }

        let scope = if self.clear_all_on_login {
            ClearScope::All
        } else {
            ClearScope::Keys(&SESSION_KEYS)
        };

        self.storage.write_batch(
            scope,
            &[
                (ACCESS_KEY, tokens.access.clone()),
                (REFRESH_KEY, tokens.refresh.clone()),
                (USER_KEY, serde_json::to_string(user)?),
                (ROLE_KEY, user.role.as_str().to_string()),
            ],
        )?;

        tracing::info!(user_id = %user.id, role = user.role.as_str(), "Session committed");
        Ok(())
    }

    /// Mirror a replacement user record, leaving the tokens in place.
    pub fn store_user(&self, user: &User) -> Result<(), StorageError> {
        if self.access_token()?.is_none() {
            return Err(StorageError::MissingAccessToken);
        }
        self.storage.write_batch(
            ClearScope::Nothing,
            &[
                (USER_KEY, serde_json::to_string(user)?),
                (ROLE_KEY, user.role.as_str().to_string()),
            ],
        )
    }

    pub fn access_token(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .storage
            .get_item(ACCESS_KEY)?
            .filter(|token| !token.is_empty()))
    }

    pub fn refresh_token(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .storage
            .get_item(REFRESH_KEY)?
            .filter(|token| !token.is_empty()))
    }

    pub fn user_role(&self) -> Result<Option<String>, StorageError> {
        self.storage.get_item(ROLE_KEY)
    }

    /// Read the stored user. An unparseable record is reported as absent.
    pub fn load_user(&self) -> Result<Option<User>, StorageError> {
        let Some(raw) = self.storage.get_item(USER_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!("Discarding unreadable stored user: {}", e);
                Ok(None)
            }
        }
    }

    /// Remove every session key. Other keys (the content cache) survive.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage
            .write_batch(ClearScope::Keys(&SESSION_KEYS), &[])?;
        tracing::info!("Session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::BackendUser;
    use chrono::Utc;

    fn store(clear_all: bool) -> SessionStore {
        SessionStore::new(LocalStorage::in_memory().unwrap(), clear_all)
    }

    fn user(json: &str) -> User {
        let payload: BackendUser = serde_json::from_str(json).unwrap();
        User::from_backend(&payload, Utc::now())
    }

    fn tokens(access: &str) -> TokenPair {
        TokenPair {
            access: access.to_string(),
            refresh: "refresh-1".to_string(),
        }
    }

    #[test]
    fn commit_writes_all_session_keys() {
        let store = store(false);
        let u = user(r#"{"id": 1, "email": "a@b.com", "username": "a", "is_staff": true}"#);
        store.commit(&tokens("tok1"), &u).unwrap();

        assert_eq!(store.access_token().unwrap().as_deref(), Some("tok1"));
        assert_eq!(store.refresh_token().unwrap().as_deref(), Some("refresh-1"));
        assert_eq!(store.user_role().unwrap().as_deref(), Some("admin"));
        assert_eq!(store.load_user().unwrap(), Some(u));
    }

    #[test]
    fn commit_preserves_unrelated_keys_by_default() {
        let store = store(false);
        store.storage().set_item("siteContent", "{}").unwrap();
        store.storage().set_item("token", "legacy").unwrap();

        let u = user(r#"{"id": 1}"#);
        store.commit(&tokens("tok1"), &u).unwrap();

        assert_eq!(
            store.storage().get_item("siteContent").unwrap().as_deref(),
            Some("{}")
        );
    }

    #[test]
    fn commit_clears_everything_when_configured() {
        let store = store(true);
        store.storage().set_item("siteContent", "{}").unwrap();

        let u = user(r#"{"id": 1}"#);
        store.commit(&tokens("tok1"), &u).unwrap();

        assert_eq!(store.storage().get_item("siteContent").unwrap(), None);
        assert_eq!(store.access_token().unwrap().as_deref(), Some("tok1"));
    }

    #[test]
    fn commit_rejects_empty_access_token() {
        let store = store(false);
        let u = user(r#"{"id": 1}"#);
        let err = store.commit(&tokens(""), &u).unwrap_err();
        assert!(matches!(err, StorageError::MissingAccessToken));
        assert_eq!(store.load_user().unwrap(), None);
    }

    #[test]
    fn store_user_requires_existing_token() {
        let store = store(false);
        let u = user(r#"{"id": 1}"#);
        assert!(store.store_user(&u).is_err());

        store.commit(&tokens("tok1"), &u).unwrap();
        let replacement = user(r#"{"id": 1, "username": "renamed", "is_superuser": true}"#);
        store.store_user(&replacement).unwrap();
        assert_eq!(store.load_user().unwrap().unwrap().name, "renamed");
        assert_eq!(store.user_role().unwrap().as_deref(), Some("admin"));
        assert_eq!(store.access_token().unwrap().as_deref(), Some("tok1"));
    }

    #[test]
    fn clear_removes_session_only() {
        let store = store(false);
        store.storage().set_item("siteContent", "{}").unwrap();
        store.commit(&tokens("tok1"), &user(r#"{"id": 1}"#)).unwrap();

        store.clear().unwrap();

        assert_eq!(store.access_token().unwrap(), None);
        assert_eq!(store.load_user().unwrap(), None);
        assert!(store.storage().get_item("siteContent").unwrap().is_some());
    }

    #[test]
    fn corrupted_user_reads_as_absent() {
        let store = store(false);
        store.storage().set_item(USER_KEY, "{not json").unwrap();
        assert_eq!(store.load_user().unwrap(), None);
    }
}
