use axum::routing::{get, post};
use axum::Router;

use crate::auth::handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(handlers::login_page))
        .route("/login/google-callback", get(handlers::google_callback))
        .route("/logout", post(handlers::logout))
        .route("/api/session", get(handlers::session))
}
