use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::api::ApiClient;
use crate::auth::controller::AuthController;
use crate::auth::session::SessionStore;
use crate::config::Config;
use crate::content::ContentSync;
use crate::db::LocalStorage;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Everything the commands and the companion server share.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
    pub auth: AuthController,
    pub content: ContentSync,
}

impl AppState {
    /// Open local storage at the configured path and wire the client,
    /// controller and content layer on top of it.
    pub fn build(config: Config) -> anyhow::Result<Self> {
        let storage = LocalStorage::open(&config.storage_path())?;
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: Config, storage: LocalStorage) -> anyhow::Result<Self> {
        let session = SessionStore::new(storage.clone(), config.auth.clear_all_on_login);
        let api = ApiClient::new(&config.api.base_url, session.clone())?;
        let auth = AuthController::load(session)?;
        let content = ContentSync::new(api.clone(), storage);
        Ok(Self {
            config,
            api,
            auth,
            content,
        })
    }
}
