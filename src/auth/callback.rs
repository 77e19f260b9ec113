//! Handling of the redirect the backend issues at the end of Google sign-in.
//!
//! The redirect either carries the whole session in its query string
//! (`user`, `access`, `refresh`, each percent-encoded once more on top of
//! the query encoding) or nothing usable, in which case the session is
//! fetched through the backend's token exchange. Every outcome is a
//! [`Navigation`]; no error leaves [`handle_callback`].

use chrono::Utc;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::api::ApiClient;
use crate::auth::controller::AuthController;
use crate::auth::models::{BackendUser, TokenPair, User};
use crate::config::AuthConfig;
use crate::error::{ApiError, StorageError};

/// Query parameters of the callback request. Empty values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub user: Option<String>,
    pub access: Option<String>,
    pub refresh: Option<String>,
    pub error: Option<String>,
    pub email: Option<String>,
}

impl CallbackParams {
    /// Parse a raw query string (without the leading `?`). When a name is
    /// repeated the first value wins.
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match name.as_ref() {
                "user" => &mut params.user,
                "access" => &mut params.access,
                "refresh" => &mut params.refresh,
                "error" => &mut params.error,
                "email" => &mut params.email,
                _ => continue,
            };
            if slot.is_none() && !value.is_empty() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    fn credentials(&self) -> Option<(&str, &str, &str)> {
        match (&self.user, &self.access, &self.refresh) {
            (Some(user), Some(access), Some(refresh)) => Some((user, access, refresh)),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    #[error("Provider returned an error: {0}")]
    Provider(String),

    #[error("Authentication data missing")]
    MissingCredentials,

    #[error("Malformed authentication payload: {0}")]
    Decode(String),

    #[error("Network failure during authentication: {0}")]
    Network(String),

    #[error("Could not save session: {0}")]
    Storage(#[from] StorageError),
}

impl CallbackError {
    /// Message shown on the login page.
    pub fn hint(&self) -> String {
        match self {
            CallbackError::Provider(code) => code.clone(),
            CallbackError::MissingCredentials => "Missing authentication data".into(),
            CallbackError::Decode(_) => "Failed to process authentication".into(),
            CallbackError::Network(_) => "Network error during authentication".into(),
            CallbackError::Storage(_) => "Failed to save session".into(),
        }
    }
}

impl From<ApiError> for CallbackError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { .. } => CallbackError::MissingCredentials,
            ApiError::Decode(msg) => CallbackError::Decode(msg),
            ApiError::Storage(e) => CallbackError::Storage(e),
            other => CallbackError::Network(other.to_string()),
        }
    }
}

/// Where the callback sends the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Landing,
    Login { hint: String },
}

impl Navigation {
    pub fn to_path(&self, config: &AuthConfig) -> String {
        match self {
            Navigation::Landing => config.landing_path.clone(),
            Navigation::Login { hint } => format!(
                "{}?error=google&message={}",
                config.login_path,
                encode_component(hint)
            ),
        }
    }
}

/// Everything except the URI-component unreserved set gets escaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, COMPONENT).to_string()
}

/// Offset of the first `%` not followed by two hex digits.
fn malformed_escape(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    bytes
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == b'%')
        .map(|(i, _)| i)
        .find(|&i| {
            !bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
        })
}

/// Strict percent-decoding: a `%` must be followed by two hex digits and
/// the decoded bytes must be UTF-8. `+` is left alone.
pub fn decode_component(input: &str) -> Result<String, CallbackError> {
    if let Some(offset) = malformed_escape(input) {
        return Err(CallbackError::Decode(format!(
            "invalid percent escape at offset {}",
            offset
        )));
    }
    percent_decode_str(input)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| CallbackError::Decode(e.to_string()))
}

/// Decode the three credential parameters into a token pair and the
/// backend user payload.
pub fn decode_credentials(
    user: &str,
    access: &str,
    refresh: &str,
) -> Result<(TokenPair, BackendUser), CallbackError> {
    let user_json = decode_component(user)?;
    let payload: BackendUser =
        serde_json::from_str(&user_json).map_err(|e| CallbackError::Decode(e.to_string()))?;
    let tokens = TokenPair {
        access: decode_component(access)?,
        refresh: decode_component(refresh)?,
    };
    if tokens.access.is_empty() {
        return Err(CallbackError::Decode("empty access token".into()));
    }
    Ok((tokens, payload))
}

/// Tokens from the backend's exchange endpoint, then the profile they
/// belong to.
async fn exchange_session(
    api: &ApiClient,
    email: Option<&str>,
) -> Result<(TokenPair, BackendUser), CallbackError> {
    tracing::info!(with_email = email.is_some(), "Callback lacks credentials, exchanging");
    let tokens = api.exchange_google_jwt(email).await?;
    if tokens.access.is_empty() {
        return Err(CallbackError::MissingCredentials);
    }
    let payload = api.current_user_with(&tokens.access).await?;
    Ok((tokens, payload))
}

async fn establish_session(
    params: &CallbackParams,
    api: &ApiClient,
    auth: &AuthController,
) -> Result<User, CallbackError> {
    if let Some(code) = &params.error {
        return Err(CallbackError::Provider(code.clone()));
    }

    let (tokens, payload) = match params.credentials() {
        Some((user, access, refresh)) => decode_credentials(user, access, refresh)?,
        None => exchange_session(api, params.email.as_deref()).await?,
    };

    let user = User::from_backend(&payload, Utc::now());
    auth.login(&tokens, user.clone())?;
    Ok(user)
}

/// Run the callback for a raw query string and decide where to go next.
pub async fn handle_callback(
    raw_query: &str,
    api: &ApiClient,
    auth: &AuthController,
) -> Navigation {
    let params = CallbackParams::from_query(raw_query);
    match establish_session(&params, api, auth).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, role = user.role.as_str(), "Google sign-in complete");
            Navigation::Landing
        }
        Err(e) => {
            tracing::warn!("Google sign-in failed: {}", e);
            Navigation::Login { hint: e.hint() }
        }
    }
}
