pub mod auth;
pub mod dashboard;
pub mod home;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The companion server: terminates the OAuth redirect and shows a minimal
/// signed-in page.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::index))
        .merge(auth::router())
        .merge(dashboard::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
