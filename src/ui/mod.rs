//! Admin view model: what the dashboard shows, independent of transport.

pub mod render;
pub mod session;

use crate::error::AppError;
use crate::models::{parse_timestamp, MergedItem, Status};

pub use render::{render_signed_out, render_view};
pub use session::{Session, SessionStore};

/// Status dropdown filter. Anything unrecognised means "all".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn parse(raw: &str) -> Self {
        raw.parse().map(StatusFilter::Only).unwrap_or(StatusFilter::All)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "ALL",
            StatusFilter::Only(status) => status.as_str(),
        }
    }

    pub fn matches(&self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

/// Search box plus status dropdown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    /// Search text as typed, kept for re-rendering the input.
    pub query: String,
    needle: String,
    pub status: StatusFilter,
}

impl Filter {
    pub fn new(query: &str, status: StatusFilter) -> Self {
        Self {
            query: query.to_string(),
            needle: query.trim().to_lowercase(),
            status,
        }
    }

    /// Status must match exactly; the search text must appear, ignoring
    /// case, in the name, email or message.
    pub fn matches(&self, item: &MergedItem) -> bool {
        if !self.status.matches(item.status) {
            return false;
        }
        if self.needle.is_empty() {
            return true;
        }

        let sub = &item.submission;
        [sub.name(), sub.email(), sub.message()]
            .into_iter()
            .flatten()
            .any(|text| text.to_lowercase().contains(&self.needle))
    }
}

pub fn visible<'a>(items: &'a [MergedItem], filter: &Filter) -> Vec<&'a MergedItem> {
    items.iter().filter(|item| filter.matches(item)).collect()
}

/// `YYYY-MM-DD HH:MM` in UTC. Missing shows `-`, unparseable shows the raw text.
pub fn format_created(raw: Option<&str>) -> String {
    match raw.filter(|s| !s.is_empty()) {
        None => "-".to_string(),
        Some(s) => parse_timestamp(s)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| s.to_string()),
    }
}

/// Per-session dashboard state: the local copy of the list plus one-shot
/// messages for the next render.
#[derive(Debug, Default)]
pub struct AdminState {
    items: Vec<MergedItem>,
    notice: Option<String>,
    alert: Option<String>,
}

impl AdminState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[MergedItem] {
        &self.items
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Apply the outcome of a list fetch. A failed fetch keeps the previous items.
    pub fn loaded(&mut self, result: Result<Vec<MergedItem>, AppError>) {
        match result {
            Ok(items) => {
                self.items = items;
                self.notice = None;
                self.alert = None;
            }
            Err(e) => {
                self.notice = Some("Load failed".to_string());
                self.alert = Some(e.public_message());
            }
        }
    }

    /// Patch the local copy after the server confirmed a status change.
    /// Returns false when the item is no longer in the list.
    pub fn status_saved(&mut self, submission_id: &str, status: Status) -> bool {
        self.notice = Some("Saved".to_string());
        self.alert = None;
        match self.items.iter_mut().find(|item| item.id() == submission_id) {
            Some(item) => {
                item.status = status;
                true
            }
            None => false,
        }
    }

    pub fn save_failed(&mut self, error: &AppError) {
        self.notice = Some("Save failed".to_string());
        self.alert = Some(error.public_message());
    }

    pub fn clear_messages(&mut self) {
        self.notice = None;
        self.alert = None;
    }
}
