use std::net::SocketAddr;

use askama::Template;
use axum::extract::{ConnectInfo, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Principal;
use crate::error::AppError;
use crate::models::Status;
use crate::state::{AppState, SharedState};
use crate::triage::{self, StatusUpdate};
use crate::ui::{self, Filter, StatusFilter};

pub const SESSION_COOKIE: &str = "formdesk_session";

struct FilterOption {
    value: &'static str,
    selected: bool,
}

#[derive(Template)]
#[template(path = "admin/index.html")]
struct IndexTemplate {
    principal: Option<String>,
    credential_label: &'static str,
    login_error: Option<String>,
    query: String,
    filter_options: Vec<FilterOption>,
    rows_html: String,
}

#[derive(Deserialize, Default)]
pub struct FilterParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub filter: String,
}

impl FilterParams {
    fn to_filter(&self) -> Filter {
        Filter::new(&self.q, StatusFilter::parse(&self.filter))
    }
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub credential: String,
}

#[derive(Deserialize)]
pub struct StatusForm {
    pub submission_id: String,
    pub status: String,
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub filter: String,
}

fn session_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

fn filter_options(selected: StatusFilter) -> Vec<FilterOption> {
    std::iter::once(StatusFilter::All)
        .chain(Status::ALL.into_iter().map(StatusFilter::Only))
        .map(|option| FilterOption {
            value: option.as_str(),
            selected: option == selected,
        })
        .collect()
}

fn render_page(
    state: &AppState,
    session: Option<Uuid>,
    filter: &Filter,
    login_error: Option<String>,
) -> String {
    let principal: Option<Principal> = session.and_then(|id| state.sessions.principal(&id));

    let rows_html = session
        .and_then(|id| state.sessions.with_view(&id, |view| ui::render_view(view, filter)))
        .unwrap_or_else(ui::render_signed_out);

    let template = IndexTemplate {
        principal: principal.map(|p| p.subject),
        credential_label: state.authenticator.credential_label(),
        login_error,
        query: filter.query.clone(),
        filter_options: filter_options(filter.status),
        rows_html,
    };
    template.render().unwrap_or_default()
}

/// Credential of the signed-in session, re-checked against the authenticator.
fn authorize(state: &AppState, id: &Uuid) -> Result<(), AppError> {
    let credential = state
        .sessions
        .credential(id)
        .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))?;
    state.authenticator.verify(&credential).map(|_| ())
}

pub async fn index(
    State(state): State<SharedState>,
    jar: CookieJar,
    Query(params): Query<FilterParams>,
) -> impl IntoResponse {
    let session = session_id(&jar).filter(|id| state.sessions.contains(id));
    Html(render_page(&state, session, &params.to_filter(), None))
}

pub async fn login(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let ip = addr.ip();
    let filter = Filter::default();

    if let Err(retry_after) = state.login_limiter.check(ip) {
        let message = format!("Too many failed attempts. Try again in {retry_after} seconds.");
        let page = render_page(&state, None, &filter, Some(message));
        return (StatusCode::TOO_MANY_REQUESTS, Html(page)).into_response();
    }

    let credential = form.credential.trim().to_string();
    let principal = match state.authenticator.verify(&credential) {
        Ok(principal) => principal,
        Err(e) => {
            if matches!(e, AppError::Unauthorized(_)) {
                state.login_limiter.record_failure(ip);
                tracing::warn!(%ip, "Admin login rejected");
            }
            let page = render_page(&state, None, &filter, Some(e.public_message()));
            return (e.status_code(), Html(page)).into_response();
        }
    };

    tracing::info!(subject = %principal.subject, "Admin signed in");
    let id = state.sessions.create(credential, principal);

    let result = triage::list_submissions(&state).await;
    state.sessions.with_view(&id, |view| view.loaded(result));

    let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .build();

    (jar.add(cookie), Redirect::to("/admin")).into_response()
}

pub async fn logout(State(state): State<SharedState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(id) = session_id(&jar) {
        if state.sessions.remove(&id) {
            tracing::info!("Admin signed out");
        }
    }

    let cleared = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (jar.remove(cleared), Redirect::to("/admin"))
}

pub async fn rows(
    State(state): State<SharedState>,
    jar: CookieJar,
    Query(params): Query<FilterParams>,
) -> impl IntoResponse {
    let filter = params.to_filter();
    let html = session_id(&jar)
        .and_then(|id| state.sessions.with_view(&id, |view| ui::render_view(view, &filter)))
        .unwrap_or_else(ui::render_signed_out);
    Html(html)
}

pub async fn refresh(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(params): Form<FilterParams>,
) -> impl IntoResponse {
    let filter = params.to_filter();
    let Some(id) = session_id(&jar).filter(|id| state.sessions.contains(id)) else {
        return Html(ui::render_signed_out());
    };

    let result = match authorize(&state, &id) {
        Ok(()) => triage::list_submissions(&state).await,
        Err(e) => Err(e),
    };

    let html = state
        .sessions
        .with_view(&id, |view| {
            view.loaded(result);
            ui::render_view(view, &filter)
        })
        .unwrap_or_else(ui::render_signed_out);
    Html(html)
}

pub async fn change_status(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<StatusForm>,
) -> impl IntoResponse {
    let filter = Filter::new(&form.q, StatusFilter::parse(&form.filter));
    let Some(id) = session_id(&jar).filter(|id| state.sessions.contains(id)) else {
        return Html(ui::render_signed_out());
    };

    let update = StatusUpdate {
        submission_id: Some(form.submission_id.clone()),
        status: Some(form.status.clone()),
    };
    let result = match authorize(&state, &id) {
        Ok(()) => triage::update_status(state.store.as_ref(), &update).await,
        Err(e) => Err(e),
    };

    let html = state
        .sessions
        .with_view(&id, |view| {
            match &result {
                Ok(record) => {
                    view.status_saved(&form.submission_id, record.status);
                }
                Err(e) => view.save_failed(e),
            }
            ui::render_view(view, &filter)
        })
        .unwrap_or_else(ui::render_signed_out);
    Html(html)
}
