use reqwest::Method;
use serde_json::json;

use crate::api::{read_json, ApiClient};
use crate::auth::models::{BackendUser, TokenPair};
use crate::error::ApiError;

impl ApiClient {
    /// Profile of the user owning the stored access token.
    pub async fn current_user(&self) -> Result<BackendUser, ApiError> {
        self.get_json("/api/user/").await
    }

    /// Profile fetched with an explicit access token, for use before the
    /// token has been committed to storage.
    pub async fn current_user_with(&self, access: &str) -> Result<BackendUser, ApiError> {
        let builder = self
            .request_anonymous(Method::GET, "/api/user/")?
            .bearer_auth(access);
        read_json(self.send(builder).await?).await
    }

    /// Trade the backend's OAuth session (cookie) for a JWT pair. With an
    /// email the POST variant is used instead.
    pub async fn exchange_google_jwt(&self, email: Option<&str>) -> Result<TokenPair, ApiError> {
        let builder = match email {
            Some(email) => self
                .request_anonymous(Method::POST, "/auth/google/jwt/")?
                .json(&json!({ "email": email })),
            None => self.request_anonymous(Method::GET, "/auth/google/jwt/")?,
        };
        read_json(self.send(builder).await?).await
    }
}
