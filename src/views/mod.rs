pub mod admin;

use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/admin") }))
        .route("/admin", get(admin::index))
        .route("/admin/login", post(admin::login))
        .route("/admin/logout", post(admin::logout))
        .route("/admin/refresh", post(admin::refresh))
        // HTMX partials
        .route("/admin/rows", get(admin::rows))
        .route("/admin/status", post(admin::change_status))
}
