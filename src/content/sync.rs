use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::content::LogoAsset;
use crate::api::ApiClient;
use crate::content::model::{PartialSiteContent, SiteContent};
use crate::content::remote::{merge_remote, to_payload};
use crate::db::LocalStorage;
use crate::error::{ApiError, StorageError};

/// Local storage key holding the last known document.
pub const SITE_CONTENT_KEY: &str = "siteContent";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Uninitialized,
    Loading,
    Ready,
}

/// Where the document observed after `mount` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    Remote,
    Cache,
    Defaults,
}

/// Single owner of the site-content document.
///
/// Starts from the static defaults, is overlaid once by [`mount`](Self::mount)
/// and then only changes through [`update`](Self::update).
#[derive(Clone)]
pub struct ContentSync {
    api: ApiClient,
    storage: LocalStorage,
    content: Arc<watch::Sender<SiteContent>>,
    state: Arc<watch::Sender<SyncState>>,
}

impl ContentSync {
    pub fn new(api: ApiClient, storage: LocalStorage) -> Self {
        let (content, _) = watch::channel(SiteContent::default());
        let (state, _) = watch::channel(SyncState::Uninitialized);
        Self {
            api,
            storage,
            content: Arc::new(content),
            state: Arc::new(state),
        }
    }

    pub fn content(&self) -> SiteContent {
        self.content.borrow().clone()
    }

    pub fn state(&self) -> SyncState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SiteContent> {
        self.content.subscribe()
    }

    /// Fetch the backend document and overlay it. Any failure falls back to
    /// the cached copy, then to the current document. Always ends `Ready`.
    pub async fn mount(&self) -> ContentSource {
        self.state.send_replace(SyncState::Loading);

        let source = match self.api.get_site_content().await {
            Ok(remote) => {
                let api = &self.api;
                self.content.send_modify(|content| {
                    let applied = merge_remote(content, &remote, |p| api.resolve_media(p));
                    tracing::debug!(applied, "Merged site content from backend");
                });
                ContentSource::Remote
            }
            Err(e) => {
                tracing::warn!("Site content fetch failed, falling back: {}", e);
                match self.read_cache() {
                    Some(cached) => {
                        self.content.send_replace(cached);
                        ContentSource::Cache
                    }
                    None => ContentSource::Defaults,
                }
            }
        };

        self.state.send_replace(SyncState::Ready);
        tracing::info!(?source, "Site content ready");
        source
    }

    fn read_cache(&self) -> Option<SiteContent> {
        let raw = match self.storage.get_item(SITE_CONTENT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Could not read cached site content: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::warn!("Ignoring unreadable cached site content: {}", e);
                None
            }
        }
    }

    /// Apply `partial` locally, cache the result, then persist to the
    /// backend in the background. The returned handle resolves to the
    /// backend outcome; dropping it leaves the write running.
    pub fn update(
        &self,
        partial: PartialSiteContent,
        logo: Option<LogoAsset>,
    ) -> Result<JoinHandle<Result<(), ApiError>>, StorageError> {
        let mut updated = self.content();
        partial.apply(&mut updated);

        self.storage
            .set_item(SITE_CONTENT_KEY, &serde_json::to_string(&updated)?)?;
        let payload = to_payload(&updated, &partial);
        self.content.send_replace(updated);

        let api = self.api.clone();
        Ok(tokio::spawn(async move {
            let result = match logo {
                Some(logo) => api.put_site_content_multipart(&payload, logo).await,
                None => api.put_site_content(&payload).await,
            };
            match &result {
                Ok(()) => tracing::info!(fields = payload.len(), "Site content saved"),
                Err(e) => tracing::warn!("Saving site content failed: {}", e),
            }
            result
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::SessionStore;
    use crate::content::model::{HeroPatch, HeroSection};

    fn sync_for(base: &str) -> ContentSync {
        let storage = LocalStorage::in_memory().unwrap();
        let api = ApiClient::new(base, SessionStore::new(storage.clone(), false)).unwrap();
        ContentSync::new(api, storage)
    }

    // Port 9 (discard) on loopback refuses connections, so fetches fail fast.
    const UNREACHABLE: &str = "http://127.0.0.1:9";

    #[test]
    fn starts_uninitialized_with_defaults() {
        let sync = sync_for(UNREACHABLE);
        assert_eq!(sync.state(), SyncState::Uninitialized);
        assert_eq!(sync.content(), SiteContent::default());
    }

    #[tokio::test]
    async fn failed_fetch_without_cache_keeps_defaults() {
        let sync = sync_for(UNREACHABLE);
        assert_eq!(sync.mount().await, ContentSource::Defaults);
        assert_eq!(sync.state(), SyncState::Ready);
        assert_eq!(sync.content(), SiteContent::default());
    }

    #[tokio::test]
    async fn failed_fetch_uses_cache() {
        let sync = sync_for(UNREACHABLE);
        sync.storage
            .set_item(SITE_CONTENT_KEY, r#"{"hero": {"title": "En cache"}}"#)
            .unwrap();

        assert_eq!(sync.mount().await, ContentSource::Cache);
        assert_eq!(sync.content().hero.title, "En cache");
        assert_eq!(
            sync.content().hero.subtitle,
            HeroSection::default().subtitle
        );
    }

    #[tokio::test]
    async fn corrupt_cache_is_ignored() {
        let sync = sync_for(UNREACHABLE);
        sync.storage.set_item(SITE_CONTENT_KEY, "{oops").unwrap();
        assert_eq!(sync.mount().await, ContentSource::Defaults);
        assert_eq!(sync.state(), SyncState::Ready);
    }

    #[tokio::test]
    async fn update_applies_locally_before_backend_answers() {
        let sync = sync_for(UNREACHABLE);
        let mut rx = sync.subscribe();

        let partial = PartialSiteContent {
            hero: Some(HeroPatch {
                title: Some("Titre local".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let handle = sync.update(partial, None).unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().hero.title, "Titre local");

        let cached = sync.storage.get_item(SITE_CONTENT_KEY).unwrap().unwrap();
        let cached: SiteContent = serde_json::from_str(&cached).unwrap();
        assert_eq!(cached.hero.title, "Titre local");

        let outcome = handle.await.unwrap();
        assert!(matches!(outcome, Err(ApiError::Network(_))));
        assert_eq!(sync.content().hero.title, "Titre local");
    }
}
