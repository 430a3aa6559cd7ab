pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod store;
pub mod triage;
pub mod ui;
pub mod views;
pub mod worker;

use std::sync::Arc;

use axum::http::{header, HeaderName, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::forms::FormsClient;
use crate::rate_limit::LoginRateLimiter;
use crate::state::{AppState, SharedState};
use crate::store::StatusStore;
use crate::ui::SessionStore;

pub fn build_app(
    config: Config,
    store: Arc<dyn StatusStore>,
) -> Result<(Router, SharedState), String> {
    let forms = match (&config.forms.site_id, &config.forms.api_token) {
        (Some(site_id), Some(token)) => Some(FormsClient::new(
            &config.forms.api_base,
            site_id,
            token,
        )?),
        _ => {
            tracing::warn!("Forms API not configured; listing will fail until FORMDESK_SITE_ID and FORMDESK_API_TOKEN are set");
            None
        }
    };

    let authenticator = auth::from_config(&config.auth);

    let state: SharedState = Arc::new(AppState {
        config,
        store,
        forms,
        authenticator,
        sessions: SessionStore::new(),
        login_limiter: LoginRateLimiter::new(),
    });

    let api = routes::api_routes().layer(SetResponseHeaderLayer::overriding(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store"),
    ));

    let security_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ));

    let app = Router::new()
        .merge(api)
        .merge(views::view_routes())
        .nest_service("/static", ServeDir::new("static"))
        .route("/health", axum::routing::get(health))
        .layer(security_headers)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    Ok((app, state))
}

async fn health() -> &'static str {
    "ok"
}
