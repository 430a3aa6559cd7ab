pub mod submissions;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

/// JSON handlers, mounted at the root and under the legacy functions prefix.
pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .merge(handlers())
        .nest("/.netlify/functions", handlers())
}

fn handlers() -> Router<SharedState> {
    Router::new()
        .route(
            "/listSubmissions",
            get(submissions::list).fallback(submissions::method_not_allowed),
        )
        .route(
            "/updateStatus",
            post(submissions::update_status).fallback(submissions::method_not_allowed),
        )
}
