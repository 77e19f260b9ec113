//! Remote API client for the lab backend.
//!
//! Every call reads the access token from the [`SessionStore`] at send time
//! and attaches it as a bearer credential when present; anonymous calls are
//! allowed for public listings. Non-2xx answers become
//! [`ApiError::Status`] carrying the status and the raw body.

pub mod content;
pub mod files;
pub mod projects;
pub mod publications;
pub mod types;
pub mod user;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::auth::session::SessionStore;
use crate::error::ApiError;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: &str, session: SessionStore) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))?;
        // Cookie jar so the OAuth token exchange can ride on the backend
        // session cookie.
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Absolute URL for an API path such as `/api/files/`.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}{}", base, path))?)
    }

    /// Resolve a media reference: absolute URLs pass through, `/media/...`
    /// paths are served from the backend origin.
    pub fn resolve_media(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.base_url.as_str().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    fn authorize(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        match self.session.access_token()? {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => Ok(builder),
        }
    }

    /// Request to an API path, with the stored bearer token when there is one.
    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(path)?;
        self.authorize(self.http.request(method, url))
    }

    /// Request to an absolute URL, with the stored bearer token when there is
    /// one.
    pub(crate) fn request_url(&self, method: Method, url: &str) -> Result<RequestBuilder, ApiError> {
        let url = Url::parse(url)?;
        self.authorize(self.http.request(method, url))
    }

    /// Request that carries only cookies, never the stored token.
    pub(crate) fn request_anonymous(
        &self,
        method: Method,
        path: &str,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(path)?;
        Ok(self.http.request(method, url))
    }

    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        check_status(response).await
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path)?).await?;
        read_json(response).await
    }

    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(method, path)?.json(body)).await?;
        read_json(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }
}

/// Path of one resource, `{collection}/{id}/{rest}`. Ids are backend keys
/// made of ASCII letters, digits, `-` and `_`; anything else could change
/// the shape of the path and is refused.
pub(crate) fn resource_path(collection: &str, id: &str, rest: &str) -> Result<String, ApiError> {
    let valid = !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if !valid {
        return Err(ApiError::InvalidId(id.to_string()));
    }
    Ok(format!("{}/{}/{}", collection, id, rest))
}

/// Turn a non-2xx response into [`ApiError::Status`], reading its body as
/// text on a best-effort basis.
pub(crate) async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().clone();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(%status, %url, "Backend request failed");
    Err(ApiError::Status { status, body })
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}
