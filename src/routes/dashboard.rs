use askama::Template;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;

use crate::extractors::MaybeUser;
use crate::routes::home::Html;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "pages/dashboard.html")]
struct DashboardTemplate {
    site_title: String,
    heading: String,
    logout_label: String,
    name: String,
    email: String,
    role: &'static str,
    file_count: usize,
    publication_count: usize,
}

/// Dashboard for the signed-in user: who they are and what they own.
async fn dashboard(State(state): State<AppState>, maybe_user: MaybeUser) -> Response {
    let Some(user) = maybe_user.0 else {
        return Redirect::to(&state.config.auth.login_path).into_response();
    };

    let (files, publications) =
        futures::join!(state.api.list_files(), state.api.list_publications());

    let file_count = match files {
        Ok(files) => files
            .iter()
            .filter(|f| f.uploaded_by.as_ref().is_some_and(|u| u.id == user.id))
            .count(),
        Err(e) => {
            tracing::warn!("Dashboard could not list files: {}", e);
            0
        }
    };
    let publication_count = match publications {
        Ok(publications) => publications
            .iter()
            .filter(|p| p.is_posted_by(&user.id))
            .count(),
        Err(e) => {
            tracing::warn!("Dashboard could not list publications: {}", e);
            0
        }
    };

    let content = state.content.content();
    Html(DashboardTemplate {
        site_title: content.meta.site_title,
        heading: content.page_titles.dashboard,
        logout_label: content.navigation.logout,
        name: user.name,
        email: user.email,
        role: user.role.as_str(),
        file_count,
        publication_count,
    })
    .into_response()
}

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}
