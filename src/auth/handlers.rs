use askama::Template;
use axum::extract::{Query, RawQuery, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Deserialize;

use crate::auth::callback::handle_callback;
use crate::auth::models::User;
use crate::error::AppResult;
use crate::extractors::{CurrentUser, MaybeUser};
use crate::routes::home::Html;
use crate::state::AppState;

// -- Templates --

#[derive(Template)]
#[template(path = "pages/login.html")]
pub struct LoginTemplate {
    pub site_title: String,
    pub heading: String,
    pub error_message: Option<String>,
    pub google_url: String,
}

// -- Request types --

#[derive(Deserialize, Default)]
pub struct LoginQuery {
    pub error: Option<String>,
    pub message: Option<String>,
}

// -- Handlers --

/// GET /login: sign-in page, with the failure hint when redirected here
/// by the callback.
pub async fn login_page(
    State(state): State<AppState>,
    maybe_user: MaybeUser,
    Query(query): Query<LoginQuery>,
) -> Response {
    if maybe_user.0.is_some() && query.error.is_none() {
        return Redirect::to(&state.config.auth.landing_path).into_response();
    }

    let content = state.content.content();
    let error_message = query.error.map(|_| {
        query
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "Échec de la connexion".to_string())
    });

    Html(LoginTemplate {
        site_title: content.meta.site_title,
        heading: content.page_titles.login,
        error_message,
        google_url: state.config.google_login_url(),
    })
    .into_response()
}

/// GET /login/google-callback: finish Google sign-in and redirect.
pub async fn google_callback(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Redirect {
    let query = query.unwrap_or_default();
    let navigation = handle_callback(&query, &state.api, &state.auth).await;
    Redirect::to(&navigation.to_path(&state.config.auth))
}

/// POST /logout
pub async fn logout(State(state): State<AppState>) -> AppResult<Redirect> {
    state.auth.logout()?;
    Ok(Redirect::to(&state.config.auth.login_path))
}

/// GET /api/session: the signed-in user as JSON, 401 otherwise.
pub async fn session(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
